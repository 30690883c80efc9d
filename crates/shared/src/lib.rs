use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type EntityId = String;

/// Версия формата сохранённой сцены
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Тип примитива (закрытый набор)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Box,
    Sphere,
    Cylinder,
}

/// Неизвестный тип примитива при импорте
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown object type '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl EntityKind {
    /// Все поддерживаемые типы
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Box, EntityKind::Sphere, EntityKind::Cylinder]
    }

    /// Имя типа в JSON-документе
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Box => "box",
            EntityKind::Sphere => "sphere",
            EntityKind::Cylinder => "cylinder",
        }
    }

    /// Отображаемое имя (используется в имени по умолчанию)
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Box => "Box",
            EntityKind::Sphere => "Sphere",
            EntityKind::Cylinder => "Cylinder",
        }
    }

    /// Половина габаритов геометрии при масштабе 1.
    /// Box 1×1×1, Sphere r=0.5, Cylinder r=0.5 h=1.
    pub fn half_extents(&self) -> [f64; 3] {
        match self {
            EntityKind::Box | EntityKind::Sphere | EntityKind::Cylinder => [0.5, 0.5, 0.5],
        }
    }

    /// Половина высоты, если геометрия не дала bounding box
    pub fn fallback_half_height(&self) -> f64 {
        match self {
            EntityKind::Box => 0.5,
            EntityKind::Sphere => 0.5,
            EntityKind::Cylinder => 0.5,
        }
    }

    /// Материал примитива умеет подсвечиваться (emissive)
    pub fn supports_highlight(&self) -> bool {
        match self {
            EntityKind::Box | EntityKind::Sphere | EntityKind::Cylinder => true,
        }
    }

    /// Цвет по умолчанию (0xRRGGBB)
    pub fn default_color(&self) -> u32 {
        match self {
            EntityKind::Box => 0x4a90d9,
            EntityKind::Sphere => 0xe94b3c,
            EntityKind::Cylinder => 0x50c878,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(EntityKind::Box),
            "sphere" => Ok(EntityKind::Sphere),
            "cylinder" => Ok(EntityKind::Cylinder),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Трансформация объекта (вращение в радианах)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Трансформация с заданной позицией
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Состояние камеры (fov в градусах)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub fov: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [6.0, 5.0, 8.0],
            target: [0.0, 0.0, 0.0],
            fov: 50.0,
        }
    }
}

impl CameraState {
    /// Конечные координаты и fov в интервале (0, 180)
    pub fn is_valid(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.target.iter().all(|v| v.is_finite())
            && self.fov.is_finite()
            && self.fov > 0.0
            && self.fov < 180.0
    }
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Запись объекта в сохранённом документе
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
    pub position: [f64; 3],
    /// Радианы
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
    /// 0xRRGGBB
    pub color: u32,
}

/// Сохранённая сцена
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Версия формата
    #[serde(default = "default_version")]
    pub version: String,
    /// Время сохранения (epoch ms)
    #[serde(default)]
    pub timestamp: i64,
    /// Объекты сцены
    pub objects: Vec<ObjectRecord>,
    /// Камера (необязательно)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraState>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            timestamp: 0,
            objects: Vec::new(),
            camera: None,
        }
    }
}
