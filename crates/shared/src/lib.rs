use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Цвет материала по умолчанию
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Цвет связей и неизвестных элементов
pub const NEUTRAL_GRAY: &str = "#808080";

// ============================================================================
// 2D-ввод
// ============================================================================

/// 2D-точка в пиксельных координатах экрана
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ограничивающий прямоугольник набора точек
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Отношение ширины к высоте; при нулевой высоте делим на 1
    pub fn aspect_ratio(&self) -> f64 {
        let denominator = if self.height == 0.0 { 1.0 } else { self.height };
        self.width / denominator
    }
}

/// Распознанная фигура
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizedShape {
    Circle,
    Square,
    Rectangle,
    Triangle,
    Line,
    Star,
    Pentagon,
    Hexagon,
    Arrow,
    Unknown,
}

impl RecognizedShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognizedShape::Circle => "circle",
            RecognizedShape::Square => "square",
            RecognizedShape::Rectangle => "rectangle",
            RecognizedShape::Triangle => "triangle",
            RecognizedShape::Line => "line",
            RecognizedShape::Star => "star",
            RecognizedShape::Pentagon => "pentagon",
            RecognizedShape::Hexagon => "hexagon",
            RecognizedShape::Arrow => "arrow",
            RecognizedShape::Unknown => "unknown",
        }
    }
}

// ============================================================================
// 3D-объекты сцены
// ============================================================================

/// Кратность химической связи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondOrder {
    Single,
    Double,
    Triple,
}

/// Вид объекта с параметрами геометрии
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ObjectKind {
    Cube {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        segments: u32,
    },
    Cylinder {
        radius: f64,
        height: f64,
        segments: u32,
    },
    Cone {
        radius: f64,
        height: f64,
        segments: u32,
    },
    Torus {
        radius: f64,
        tube: f64,
        segments: u32,
    },
    Pyramid {
        radius: f64,
        height: f64,
    },
    Plane {
        width: f64,
        height: f64,
    },
    Text3d {
        text: String,
        font_size: f64,
        font_depth: f64,
    },
    Atom {
        element: String,
        radius: f64,
    },
    /// Связь хранит ссылки на атомы по id (не владеет ими)
    Bond {
        bond_order: BondOrder,
        start_atom_id: ObjectId,
        end_atom_id: ObjectId,
        radius: f64,
    },
    /// Произвольный рисунок, выдавливаемый в меш
    CustomDrawing {
        drawing_points: Vec<Point2D>,
        depth: f64,
    },
}

impl ObjectKind {
    /// Имя вида без параметров (совпадает с тегом сериализации)
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Cube { .. } => "cube",
            ObjectKind::Sphere { .. } => "sphere",
            ObjectKind::Cylinder { .. } => "cylinder",
            ObjectKind::Cone { .. } => "cone",
            ObjectKind::Torus { .. } => "torus",
            ObjectKind::Pyramid { .. } => "pyramid",
            ObjectKind::Plane { .. } => "plane",
            ObjectKind::Text3d { .. } => "text3d",
            ObjectKind::Atom { .. } => "atom",
            ObjectKind::Bond { .. } => "bond",
            ObjectKind::CustomDrawing { .. } => "custom_drawing",
        }
    }

    /// Ссылки на другие объекты (только у связей)
    pub fn references(&self) -> Option<(&ObjectId, &ObjectId)> {
        match self {
            ObjectKind::Bond {
                start_atom_id,
                end_atom_id,
                ..
            } => Some((start_atom_id, end_atom_id)),
            _ => None,
        }
    }
}

/// Тип материала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Standard,
    Phong,
    Basic,
    Wireframe,
    Glass,
    Metallic,
}

/// Материал объекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub color: String,
    pub opacity: f64,
    pub metalness: f64,
    pub roughness: f64,
    pub emissive: String,
    pub emissive_intensity: f64,
    pub wireframe: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Standard,
            color: DEFAULT_COLOR.to_string(),
            opacity: 1.0,
            metalness: 0.3,
            roughness: 0.7,
            emissive: "#000000".to_string(),
            emissive_intensity: 0.0,
            wireframe: false,
        }
    }
}

impl Material {
    /// Материал по умолчанию с заданным цветом
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }
}

/// Объект сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object3D {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
    pub material: Material,
}

impl Object3D {
    /// Объект с нулевым поворотом и единичным масштабом
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            material: Material::default(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Частичное изменение свойств объекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
}

// ============================================================================
// Сохранение сцены
// ============================================================================

/// Режим камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Настройки отображения сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    pub background_color: String,
    pub show_grid: bool,
    pub show_axes: bool,
    pub camera_mode: CameraMode,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background_color: "#1a1a2e".to_string(),
            show_grid: true,
            show_axes: true,
            camera_mode: CameraMode::Perspective,
        }
    }
}

/// Формат файла сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneFile {
    pub objects: Vec<Object3D>,
    pub settings: SceneSettings,
}

// ============================================================================
// Молекулы
// ============================================================================

/// Атом шаблона молекулы (позиция относительно центра молекулы)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAtom {
    pub element: String,
    pub position: [f64; 3],
}

/// Связь шаблона: индексы в массиве атомов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBond {
    pub atom_index_a: usize,
    pub atom_index_b: usize,
    pub order: BondOrder,
}

/// Шаблон молекулы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeTemplate {
    pub name: String,
    pub formula: String,
    pub atoms: Vec<TemplateAtom>,
    pub bonds: Vec<TemplateBond>,
}

impl MoleculeTemplate {
    /// Все индексы связей указывают на существующие атомы
    pub fn is_consistent(&self) -> bool {
        self.bonds
            .iter()
            .all(|b| b.atom_index_a < self.atoms.len() && b.atom_index_b < self.atoms.len())
    }
}

// ============================================================================
// Текстовые команды
// ============================================================================

/// Действие команды
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Create,
    Delete,
    Modify,
    Clear,
    Unknown,
}

/// Цель команды: примитив, текст или молекула
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandTarget {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Pyramid,
    Plane,
    Text3d,
    Molecule,
}

impl CommandTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandTarget::Cube => "cube",
            CommandTarget::Sphere => "sphere",
            CommandTarget::Cylinder => "cylinder",
            CommandTarget::Cone => "cone",
            CommandTarget::Torus => "torus",
            CommandTarget::Pyramid => "pyramid",
            CommandTarget::Plane => "plane",
            CommandTarget::Text3d => "text3d",
            CommandTarget::Molecule => "molecule",
        }
    }
}

/// Расположение нескольких копий
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    Line,
    Circle,
    Grid,
}

/// Подсказки для материала из ключевых слов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaterialHints {
    #[serde(default)]
    pub metallic: bool,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub glowing: bool,
    #[serde(default)]
    pub wireframe: bool,
}

impl MaterialHints {
    pub fn is_empty(&self) -> bool {
        !(self.metallic || self.transparent || self.glowing || self.wireframe)
    }

    /// Применить подсказки к материалу
    pub fn apply(&self, material: &mut Material) {
        if self.metallic {
            material.kind = MaterialKind::Metallic;
            material.metalness = 1.0;
            material.roughness = 0.2;
        }
        if self.transparent {
            material.kind = MaterialKind::Glass;
            material.opacity = 0.3;
        }
        if self.glowing {
            material.emissive = material.color.clone();
            material.emissive_intensity = 0.5;
        }
        if self.wireframe {
            material.wireframe = true;
        }
    }
}

/// Свойства, извлечённые из команды
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommandProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecule_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrangement: Option<Arrangement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_hints: Option<MaterialHints>,
}

impl CommandProperties {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Результат разбора команды
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    pub action: CommandAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_kind: Option<CommandTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<CommandProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedCommand {
    pub fn new(action: CommandAction) -> Self {
        Self {
            action,
            object_kind: None,
            properties: None,
            error: None,
        }
    }

    pub fn unknown(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(CommandAction::Unknown)
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.action == CommandAction::Unknown
    }
}

// ============================================================================
// HTTP API
// ============================================================================

/// Откуда взят результат разбора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    Local,
    Fallback,
}

/// Запрос на выполнение текстовой команды
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

/// Ответ на текстовую команду
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub command: ParsedCommand,
    pub source: ParseSource,
    /// Созданные или изменённые объекты
    pub objects: Vec<Object3D>,
    /// Удалённые объекты
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<ObjectId>,
}

/// Режим обработки рисунка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Распознать фигуру и создать примитив
    #[default]
    Shape,
    /// Выдавить рисунок как есть
    Freeform,
}

/// Запрос на создание объекта из рисунка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub points: Vec<Point2D>,
    #[serde(default)]
    pub mode: DrawMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
}

/// Ответ на рисунок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    pub shape: RecognizedShape,
    pub size: f64,
    pub objects: Vec<Object3D>,
}

/// Запрос на классификацию рисунка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub points: Vec<Point2D>,
}

/// Результат классификации без изменения сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub shape: RecognizedShape,
    pub size: f64,
    pub bounding_box: BoundingBox,
}

/// Запрос на выдавливание рисунка в меш
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeRequest {
    pub points: Vec<Point2D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Результат отмены/повтора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStepResponse {
    pub applied: bool,
    pub scene: SceneFile,
}
