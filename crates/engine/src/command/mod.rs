//! Natural-language command parsing.
//!
//! [`parse_command_simple`] is a pure keyword/regex matcher over the
//! lowercased input. It never fails: anything it cannot make sense of
//! becomes an `unknown` command whose `error` lists example syntaxes.
//! [`CommandInterpreter`] wraps it with an injected history store and the
//! optional single-shot fallback from [`fallback`].

pub mod fallback;
pub mod history;
pub mod tables;

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use shared::{CommandAction, CommandProperties, CommandTarget, MaterialHints, ParsedCommand};

use crate::molecule::{find_molecule, molecule_keywords};
use fallback::{CommandFallback, Interpretation};
use history::CommandHistoryStore;
use tables::*;

/// Example syntaxes shown for commands that could not be understood.
pub const COMMAND_HINT: &str = "Try commands like: \"create a red sphere\", \
\"make a large blue cube to the left\", \"add 5 spheres in a circle\", \
\"create text \\\"Hello\\\"\", \"create a water molecule\", \"clear\"";

/// Words that end an unquoted text payload.
const TEXT_STOP_WORDS: [&str; 9] = [
    "in", "at", "with", "on", "to", "colored", "coloured", "size", "that",
];

struct Patterns {
    clear: Regex,
    make_it: Regex,
    leading_verb: Regex,
    color: Regex,
    size_word: Regex,
    size_number: Regex,
    coordinates: Regex,
    named_position: Regex,
    count: Regex,
    arrangement: Regex,
    shape: Regex,
    synonym: Regex,
    molecule_keyword: Regex,
    molecule_of: Regex,
    molecule_suffix: Regex,
    quoted: Regex,
    text_payload: Regex,
    metallic: Regex,
    transparent: Regex,
    glowing: Regex,
    wireframe: Regex,
}

fn word_set(words: impl IntoIterator<Item = &'static str>) -> String {
    format!(r"\b(?:{})\b", alternation(words))
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let molecule_words: Vec<String> = molecule_keywords().into_iter().map(|(k, _)| k).collect();
        let molecule_alt = alternation(molecule_words.iter().map(String::as_str));
        let position_names = alternation(POSITIONS.iter().map(|(n, _)| *n));

        Patterns {
            clear: Regex::new(
                r"^(?:please\s+)?(?:(?:clear|reset)\b|(?:delete|remove)\s+(?:all|everything)\b)",
            )
            .expect("valid regex"),
            make_it: Regex::new(r"^(?:please\s+)?make\s+(?:it|them|that|this)\b")
                .expect("valid regex"),
            leading_verb: Regex::new(r"^(?:please\s+)?(?:(?:can|could|would)\s+you\s+)?([a-z]+)")
                .expect("valid regex"),
            color: Regex::new(&format!(
                r"\b({})\b",
                alternation(COLORS.iter().map(|(n, _)| *n))
            ))
            .expect("valid regex"),
            size_word: Regex::new(&format!(
                r"\b({})\b",
                alternation(SIZES.iter().map(|(n, _)| *n))
            ))
            .expect("valid regex"),
            size_number: Regex::new(r"\b(?:size|radius)\s*(?:of\s+|=\s*|:\s*)?(\d+(?:\.\d+)?)")
                .expect("valid regex"),
            coordinates: Regex::new(
                r"\b(?:at|position)\s*(?:of\s+)?[\(\[]?\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)",
            )
            .expect("valid regex"),
            named_position: Regex::new(&format!(
                r"\b(?:to the|on the|at the|in the|to|at|in)\s+({position_names})\b|\b(above|below)\b"
            ))
            .expect("valid regex"),
            count: Regex::new(
                r"\b(\d+)\s+(?:[a-z]+\s+){0,3}?(?:cubes|spheres|cylinders|cones|pyramids|toruses|tori|planes|objects|boxes|balls|rings|donuts)\b",
            )
            .expect("valid regex"),
            arrangement: Regex::new(r"\bin\s+(?:an?\s+)?(row|line|circle|grid)\b")
                .expect("valid regex"),
            shape: Regex::new(&format!(
                r"\b({})(?:es|s)?\b",
                alternation(SHAPES.iter().map(|(n, _)| *n))
            ))
            .expect("valid regex"),
            synonym: Regex::new(&format!(
                r"\b({})\b",
                alternation(SHAPE_SYNONYMS.iter().map(|(n, _)| *n))
            ))
            .expect("valid regex"),
            molecule_keyword: Regex::new(&format!(r"\b({molecule_alt})\b")).expect("valid regex"),
            molecule_of: Regex::new(r"\bmolecules?\s+(?:of\s+)?([a-z0-9]+)").expect("valid regex"),
            molecule_suffix: Regex::new(r"\b([a-z0-9]+)\s+molecules?\b").expect("valid regex"),
            quoted: Regex::new("\"([^\"]+)\"|\u{201C}([^\u{201D}]+)\u{201D}").expect("valid regex"),
            text_payload: Regex::new(
                r"(?i)\b(?:text|words?)\s+(?:saying\s+|that\s+says\s+|reading\s+)?(.+?)(?:\s+(?:in|at|with|on|to|colou?red|size|that)\b|$)",
            )
            .expect("valid regex"),
            metallic: Regex::new(&word_set(METALLIC_WORDS)).expect("valid regex"),
            transparent: Regex::new(&word_set(TRANSPARENT_WORDS)).expect("valid regex"),
            glowing: Regex::new(&word_set(GLOWING_WORDS)).expect("valid regex"),
            wireframe: Regex::new(r"\bwire\s?frame\b").expect("valid regex"),
        }
    })
}

/// Parse a free-text command without any external help.
pub fn parse_command_simple(input: &str) -> ParsedCommand {
    let original = input.trim();
    if original.is_empty() {
        return ParsedCommand::unknown(format!("Empty command. {COMMAND_HINT}"));
    }

    let lower = original.to_lowercase();
    let p = patterns();
    // Keyword matching ignores quoted payloads ("create text "red"" is not red).
    let scan = p.quoted.replace_all(&lower, " ").into_owned();

    let parsed = if p.clear.is_match(&scan) {
        ParsedCommand::new(CommandAction::Clear)
    } else if p.make_it.is_match(&scan) {
        parse_modify(&scan, original)
    } else {
        let verb = p
            .leading_verb
            .captures(&scan)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or_default();

        if CREATE_VERBS.contains(&verb) {
            parse_create(&scan, original)
        } else if DELETE_VERBS.contains(&verb) {
            parse_delete(&scan)
        } else if MODIFY_VERBS.contains(&verb) {
            parse_modify(&scan, original)
        } else {
            ParsedCommand::unknown(format!("Unrecognized command \"{original}\". {COMMAND_HINT}"))
        }
    };

    tracing::debug!(
        input = original,
        action = ?parsed.action,
        kind = parsed.object_kind.map(|k| k.as_str()),
        "Parsed command"
    );
    parsed
}

fn parse_create(scan: &str, original: &str) -> ParsedCommand {
    let mut props = extract_properties(scan, original);

    match find_molecule_mention(scan) {
        Some(Ok(name)) => {
            props.molecule_name = Some(name.to_string());
            props.text = None;
            return ParsedCommand {
                object_kind: Some(CommandTarget::Molecule),
                properties: Some(props),
                ..ParsedCommand::new(CommandAction::Create)
            };
        }
        Some(Err(message)) => return ParsedCommand::unknown(message),
        None => {}
    }

    let target = match (find_shape(scan), props.text.is_some()) {
        (Some(target), _) => target,
        (None, true) => CommandTarget::Text3d,
        (None, false) => {
            return ParsedCommand::unknown(format!(
                "Could not find an object to create. {COMMAND_HINT}"
            ))
        }
    };
    if target != CommandTarget::Text3d {
        props.text = None;
    }

    ParsedCommand {
        object_kind: Some(target),
        properties: (!props.is_empty()).then_some(props),
        ..ParsedCommand::new(CommandAction::Create)
    }
}

fn parse_delete(scan: &str) -> ParsedCommand {
    ParsedCommand {
        object_kind: find_shape(scan),
        ..ParsedCommand::new(CommandAction::Delete)
    }
}

fn parse_modify(scan: &str, original: &str) -> ParsedCommand {
    let all = extract_properties(scan, original);
    let props = CommandProperties {
        color: all.color,
        size: all.size,
        position: all.position,
        material_hints: all.material_hints,
        ..CommandProperties::default()
    };
    if props.is_empty() {
        return ParsedCommand::unknown(
            "Nothing to change. Try \"make it red\", \"make it huge\" or \"move it to the left\"",
        );
    }

    ParsedCommand {
        object_kind: find_shape(scan),
        properties: Some(props),
        ..ParsedCommand::new(CommandAction::Modify)
    }
}

/// Extract every keyword-driven property; fields that do not occur stay `None`.
fn extract_properties(scan: &str, original: &str) -> CommandProperties {
    let p = patterns();

    let color = p
        .color
        .captures(scan)
        .and_then(|c| color_hex(&c[1]))
        .map(str::to_string);

    let size = p
        .size_number
        .captures(scan)
        .and_then(|c| c[1].parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .or_else(|| p.size_word.captures(scan).and_then(|c| size_value(&c[1])));

    let position = p
        .coordinates
        .captures(scan)
        .and_then(|c| {
            let x = c[1].parse::<f64>().ok()?;
            let y = c[2].parse::<f64>().ok()?;
            let z = c[3].parse::<f64>().ok()?;
            Some([x, y, z])
        })
        .filter(|p| p.iter().all(|v| v.is_finite()))
        .or_else(|| {
            p.named_position.captures(scan).and_then(|c| {
                c.get(1)
                    .or_else(|| c.get(2))
                    .and_then(|m| named_position(m.as_str()))
            })
        });

    let count = p.count.captures(scan).and_then(|c| c[1].parse::<u32>().ok());

    let arrangement = p
        .arrangement
        .captures(scan)
        .and_then(|c| tables::arrangement(&c[1]));

    let hints = MaterialHints {
        metallic: p.metallic.is_match(scan),
        transparent: p.transparent.is_match(scan),
        glowing: p.glowing.is_match(scan),
        wireframe: p.wireframe.is_match(scan),
    };

    CommandProperties {
        color,
        size,
        position,
        text: extract_text(original),
        molecule_name: None,
        count,
        arrangement,
        material_hints: (!hints.is_empty()).then_some(hints),
    }
}

/// Text payload, taken from the original input so case is preserved.
fn extract_text(original: &str) -> Option<String> {
    let p = patterns();
    if let Some(c) = p.quoted.captures(original) {
        let text = c.get(1).or_else(|| c.get(2))?.as_str().trim();
        return (!text.is_empty()).then(|| text.to_string());
    }

    let text = p.text_payload.captures(original)?.get(1)?.as_str().trim();
    let first_word = text.split_whitespace().next()?.to_lowercase();
    if TEXT_STOP_WORDS.contains(&first_word.as_str()) {
        return None;
    }
    Some(text.to_string())
}

/// Earliest direct primitive name, else the earliest synonym.
///
/// Arrangement phrases are masked first so "in a circle" is not a sphere.
fn find_shape(scan: &str) -> Option<CommandTarget> {
    let p = patterns();
    let masked = p.arrangement.replace_all(scan, " ");
    p.shape
        .captures(&masked)
        .and_then(|c| shape_target(&c[1]))
        .or_else(|| p.synonym.captures(&masked).and_then(|c| shape_target(&c[1])))
}

/// `Some(Ok(name))` for a catalog molecule, `Some(Err(message))` when a
/// molecule is asked for but not in the catalog, `None` when no molecule
/// is mentioned.
fn find_molecule_mention(scan: &str) -> Option<Result<&'static str, String>> {
    let p = patterns();
    if let Some(c) = p.molecule_keyword.captures(scan) {
        return Some(
            find_molecule(&c[1])
                .map(|m| m.name.as_str())
                .map_err(|e| e.to_string()),
        );
    }

    if !scan.contains("molecule") {
        return None;
    }
    let name = p
        .molecule_of
        .captures(scan)
        .or_else(|| p.molecule_suffix.captures(scan))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|n| !["a", "an", "the", "some"].contains(n));
    Some(match name {
        Some(name) => find_molecule(name)
            .map(|m| m.name.as_str())
            .map_err(|e| e.to_string()),
        None => Err("Molecule not found".to_string()),
    })
}

/// Command parser with an injected history store.
pub struct CommandInterpreter<H: CommandHistoryStore> {
    history: H,
}

impl<H: CommandHistoryStore> CommandInterpreter<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    /// Record `input` and parse it locally.
    pub fn parse(&mut self, input: &str) -> ParsedCommand {
        self.record(input);
        parse_command_simple(input)
    }

    /// Record `input`, parse it locally and consult `fallback` if needed.
    pub async fn parse_with_fallback<F: CommandFallback>(
        &mut self,
        input: &str,
        fallback: &F,
        timeout: Duration,
    ) -> Interpretation {
        self.record(input);
        fallback::parse_with_fallback(input, fallback, timeout).await
    }

    /// Newest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.history.recent(n)
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    fn record(&mut self, input: &str) {
        let input = input.trim();
        if !input.is_empty() {
            self.history.append(input);
        }
    }
}
