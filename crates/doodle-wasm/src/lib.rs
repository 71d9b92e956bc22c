use wasm_bindgen::prelude::*;

use doodle_engine::command::parse_command_simple;
use doodle_engine::extrude;
use doodle_engine::factory::{self, PrimitiveKind, PrimitiveParams};
use doodle_engine::molecule::{find_molecule, instantiate_molecule as instantiate};
use doodle_engine::new_object_id;
use doodle_engine::recognize;
use shared::Point2D;

/// Парсит JSON-массив точек `[{x, y}, ...]`
fn parse_points(points_json: &str) -> Result<Vec<Point2D>, String> {
    serde_json::from_str(points_json).map_err(|e| format!("Invalid points: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn js(message: String) -> JsError {
    JsError::new(&message)
}

fn recognize_impl(points_json: &str) -> Result<String, String> {
    let points = parse_points(points_json)?;
    Ok(recognize::recognize_shape(&points).as_str().to_string())
}

fn estimate_size_impl(points_json: &str) -> Result<f64, String> {
    let points = parse_points(points_json)?;
    Ok(recognize::estimate_size(&points))
}

fn extrude_impl(points_json: &str) -> Result<String, String> {
    let points = parse_points(points_json)?;
    match extrude::extrude_drawing(&points) {
        Some(mesh) => to_json(&mesh),
        None => Ok("null".to_string()),
    }
}

fn molecule_impl(name: &str, position: [f64; 3]) -> Result<String, String> {
    let template = find_molecule(name).map_err(|e| e.to_string())?;
    let objects = instantiate(template, position, new_object_id).into_objects();
    to_json(&objects)
}

fn primitive_impl(kind: &str, size: f64, color: Option<String>) -> Result<String, String> {
    let kind = PrimitiveKind::from_name(kind).ok_or_else(|| format!("Unknown primitive: {}", kind))?;
    if !(size.is_finite() && size > 0.0) {
        return Err(format!("Invalid size: {}", size));
    }
    let params = PrimitiveParams {
        color,
        ..PrimitiveParams::sized(size)
    };
    to_json(&factory::create_primitive(new_object_id(), kind, &params))
}

/// Распознаёт фигуру по точкам рисунка
#[wasm_bindgen]
pub fn recognize_shape(points_json: &str) -> Result<String, JsError> {
    recognize_impl(points_json).map_err(js)
}

/// Оценивает размер объекта по рисунку
#[wasm_bindgen]
pub fn estimate_size(points_json: &str) -> Result<f64, JsError> {
    estimate_size_impl(points_json).map_err(js)
}

/// Разбирает текстовую команду, возвращает ParsedCommand в JSON
#[wasm_bindgen]
pub fn parse_command(text: &str) -> Result<String, JsError> {
    to_json(&parse_command_simple(text)).map_err(js)
}

/// Выдавливает рисунок в меш; `null` если точек меньше трёх
#[wasm_bindgen]
pub fn extrude_drawing(points_json: &str) -> Result<String, JsError> {
    extrude_impl(points_json).map_err(js)
}

/// Создаёт атомы и связи молекулы в заданной точке
#[wasm_bindgen]
pub fn instantiate_molecule(name: &str, x: f64, y: f64, z: f64) -> Result<String, JsError> {
    molecule_impl(name, [x, y, z]).map_err(js)
}

/// Создаёт примитив заданного вида и размера
#[wasm_bindgen]
pub fn create_primitive(kind: &str, size: f64, color: Option<String>) -> Result<String, JsError> {
    primitive_impl(kind, size, color).map_err(js)
}
