//! Single task owning the scene and the command interpreter.
//!
//! Handlers talk to it through a cloneable [`SceneHandle`]; every message
//! carries a oneshot sender for the reply, so edits are applied one at a time
//! in arrival order.
//!
//! Autosave and file-backed history writes run synchronously inside the
//! actor, so a slow disk delays the next message. Every write must land
//! before the reply that reports the edit.

use doodle_engine::command::history::CommandHistoryStore;
use doodle_engine::command::CommandInterpreter;
use doodle_engine::dispatch::{dispatch, DispatchOutcome};
use doodle_engine::error::SceneResult;
use doodle_engine::scene::SceneState;
use shared::{ObjectId, ObjectPatch, Object3D, ParsedCommand, SceneFile, SceneSettings};
use tokio::sync::{mpsc, oneshot};

use crate::error::ApiError;

const MAILBOX_CAPACITY: usize = 64;

pub type BoxedHistory = Box<dyn CommandHistoryStore + Send>;

enum SceneMessage {
    Snapshot {
        reply: oneshot::Sender<SceneFile>,
    },
    Replace {
        file: SceneFile,
        reply: oneshot::Sender<SceneResult<SceneFile>>,
    },
    Settings {
        settings: SceneSettings,
        reply: oneshot::Sender<SceneResult<SceneFile>>,
    },
    Parse {
        text: String,
        reply: oneshot::Sender<ParsedCommand>,
    },
    Dispatch {
        command: ParsedCommand,
        reply: oneshot::Sender<SceneResult<DispatchOutcome>>,
    },
    Add {
        objects: Vec<Object3D>,
        reply: oneshot::Sender<SceneResult<Vec<ObjectId>>>,
    },
    Update {
        id: ObjectId,
        patch: ObjectPatch,
        reply: oneshot::Sender<SceneResult<Object3D>>,
    },
    Remove {
        id: ObjectId,
        reply: oneshot::Sender<SceneResult<Vec<ObjectId>>>,
    },
    Undo {
        reply: oneshot::Sender<(bool, SceneFile)>,
    },
    Redo {
        reply: oneshot::Sender<(bool, SceneFile)>,
    },
    History {
        limit: usize,
        reply: oneshot::Sender<Vec<String>>,
    },
}

pub struct SceneActor {
    scene: SceneState,
    interpreter: CommandInterpreter<BoxedHistory>,
    inbox: mpsc::Receiver<SceneMessage>,
}

impl SceneActor {
    /// Start the actor on the current runtime and return its handle.
    pub fn spawn(scene: SceneState, history: BoxedHistory) -> SceneHandle {
        let (tx, inbox) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = SceneActor {
            scene,
            interpreter: CommandInterpreter::new(history),
            inbox,
        };
        tokio::spawn(actor.run());
        SceneHandle { tx }
    }

    async fn run(mut self) {
        tracing::debug!(objects = self.scene.len(), "Scene actor started");
        while let Some(message) = self.inbox.recv().await {
            self.handle(message);
        }
        tracing::debug!("Scene actor stopped");
    }

    fn handle(&mut self, message: SceneMessage) {
        // A dropped receiver means the request was cancelled; nothing to do.
        match message {
            SceneMessage::Snapshot { reply } => {
                let _ = reply.send(self.scene.scene().clone());
            }
            SceneMessage::Replace { file, reply } => {
                let result = self
                    .scene
                    .replace_scene(file)
                    .map(|()| self.scene.scene().clone());
                let _ = reply.send(result);
            }
            SceneMessage::Settings { settings, reply } => {
                let result = self
                    .scene
                    .set_settings(settings)
                    .map(|()| self.scene.scene().clone());
                let _ = reply.send(result);
            }
            SceneMessage::Parse { text, reply } => {
                let _ = reply.send(self.interpreter.parse(&text));
            }
            SceneMessage::Dispatch { command, reply } => {
                let _ = reply.send(dispatch(&command, &mut self.scene));
            }
            SceneMessage::Add { objects, reply } => {
                let _ = reply.send(self.scene.add_objects(objects));
            }
            SceneMessage::Update { id, patch, reply } => {
                let _ = reply.send(self.scene.update_object(&id, patch));
            }
            SceneMessage::Remove { id, reply } => {
                let _ = reply.send(self.scene.remove_object(&id));
            }
            SceneMessage::Undo { reply } => {
                let applied = self.scene.undo();
                let _ = reply.send((applied, self.scene.scene().clone()));
            }
            SceneMessage::Redo { reply } => {
                let applied = self.scene.redo();
                let _ = reply.send((applied, self.scene.scene().clone()));
            }
            SceneMessage::History { limit, reply } => {
                let _ = reply.send(self.interpreter.recent(limit));
            }
        }
    }
}

/// Cloneable mailbox address of the [`SceneActor`].
#[derive(Clone)]
pub struct SceneHandle {
    tx: mpsc::Sender<SceneMessage>,
}

impl SceneHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SceneMessage,
    ) -> Result<T, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| ApiError::SceneUnavailable)?;
        rx.await.map_err(|_| ApiError::SceneUnavailable)
    }

    pub async fn snapshot(&self) -> Result<SceneFile, ApiError> {
        self.request(|reply| SceneMessage::Snapshot { reply }).await
    }

    pub async fn replace(&self, file: SceneFile) -> Result<SceneFile, ApiError> {
        Ok(self
            .request(|reply| SceneMessage::Replace { file, reply })
            .await??)
    }

    pub async fn set_settings(&self, settings: SceneSettings) -> Result<SceneFile, ApiError> {
        Ok(self
            .request(|reply| SceneMessage::Settings { settings, reply })
            .await??)
    }

    /// Record `text` in the history and parse it locally.
    pub async fn parse(&self, text: String) -> Result<ParsedCommand, ApiError> {
        self.request(|reply| SceneMessage::Parse { text, reply }).await
    }

    pub async fn dispatch(&self, command: ParsedCommand) -> Result<DispatchOutcome, ApiError> {
        Ok(self
            .request(|reply| SceneMessage::Dispatch { command, reply })
            .await??)
    }

    pub async fn add_objects(&self, objects: Vec<Object3D>) -> Result<Vec<ObjectId>, ApiError> {
        Ok(self
            .request(|reply| SceneMessage::Add { objects, reply })
            .await??)
    }

    pub async fn update(&self, id: ObjectId, patch: ObjectPatch) -> Result<Object3D, ApiError> {
        Ok(self
            .request(|reply| SceneMessage::Update { id, patch, reply })
            .await??)
    }

    pub async fn remove(&self, id: ObjectId) -> Result<Vec<ObjectId>, ApiError> {
        Ok(self
            .request(|reply| SceneMessage::Remove { id, reply })
            .await??)
    }

    pub async fn undo(&self) -> Result<(bool, SceneFile), ApiError> {
        self.request(|reply| SceneMessage::Undo { reply }).await
    }

    pub async fn redo(&self) -> Result<(bool, SceneFile), ApiError> {
        self.request(|reply| SceneMessage::Redo { reply }).await
    }

    /// Up to `limit` commands, newest first.
    pub async fn history(&self, limit: usize) -> Result<Vec<String>, ApiError> {
        self.request(|reply| SceneMessage::History { limit, reply })
            .await
    }
}
