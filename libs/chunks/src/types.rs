use serde::Deserialize;
use std::fmt;
use std::path::Path;

// --- Errors ---

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    EmptyCatalog,
    InvalidChunkSize(f32),
    InvalidWindowSize(u32),
    InvalidDescriptor { name: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read generation config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse generation config ron: {e}"),
            ConfigError::EmptyCatalog => {
                write!(f, "content catalog must define at least one descriptor")
            }
            ConfigError::InvalidChunkSize(size) => {
                write!(f, "chunk_size={size} must be positive and finite")
            }
            ConfigError::InvalidWindowSize(size) => {
                write!(f, "window size {size} must be at least one cell")
            }
            ConfigError::InvalidDescriptor { name, reason } => {
                write!(f, "content descriptor '{name}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// --- Content ---

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub enum ContentShape {
    Cuboid { size: (f32, f32, f32) },
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
}

impl ContentShape {
    /// Vertical extent, used to rest the object on the chunk's ground plane.
    pub fn height(&self) -> f32 {
        match self {
            ContentShape::Cuboid { size } => size.1,
            ContentShape::Sphere { radius } => radius * 2.0,
            ContentShape::Cylinder { height, .. } => *height,
        }
    }

    fn dimensions(&self) -> Vec<f32> {
        match self {
            ContentShape::Cuboid { size } => vec![size.0, size.1, size.2],
            ContentShape::Sphere { radius } => vec![*radius],
            ContentShape::Cylinder { radius, height } => vec![*radius, *height],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ContentDescriptor {
    pub name: String,
    pub shape: ContentShape,
    #[serde(default = "default_color_srgb")]
    pub color_srgb: (f32, f32, f32),
}

impl ContentDescriptor {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDescriptor {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        if let Some(d) = self
            .shape
            .dimensions()
            .into_iter()
            .find(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(invalid(format!("shape dimension {d} must be positive and finite")));
        }
        let (r, g, b) = self.color_srgb;
        if [r, g, b].iter().any(|c| !c.is_finite()) {
            return Err(invalid("color has non-finite channel".to_string()));
        }

        Ok(())
    }
}

fn default_color_srgb() -> (f32, f32, f32) {
    (0.5, 0.5, 0.5)
}

/// Ordered, non-empty list of placeable content.
#[derive(Clone, Debug)]
pub struct ContentCatalog {
    entries: Vec<ContentDescriptor>,
}

impl ContentCatalog {
    pub fn new(entries: Vec<ContentDescriptor>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&ContentDescriptor> {
        self.entries.get(index)
    }

    pub fn as_slice(&self) -> &[ContentDescriptor] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentDescriptor> {
        self.entries.iter()
    }
}

// --- Window ---

/// Side length of the streaming window, in cells.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum WindowSize {
    Small,
    Medium,
    Large,
    Cells(u32),
}

impl WindowSize {
    pub fn cells(self) -> u32 {
        match self {
            WindowSize::Small => 3,
            WindowSize::Medium => 7,
            WindowSize::Large => 14,
            WindowSize::Cells(n) => n,
        }
    }
}

// --- Config ---

#[derive(Clone, Debug, Deserialize)]
pub struct GenerationFile {
    pub chunk_size: f32,
    pub window: WindowSize,
    #[serde(default)]
    pub salt: i32,
    pub catalog: Vec<ContentDescriptor>,
}

/// Validated generation parameters. Fixed for the lifetime of a controller.
#[derive(Clone, Debug)]
pub struct GenerationParams {
    chunk_size: f32,
    window_size: u32,
    salt: i32,
    catalog: ContentCatalog,
}

impl GenerationParams {
    pub fn new(
        chunk_size: f32,
        window_size: u32,
        salt: i32,
        catalog: ContentCatalog,
    ) -> Result<Self, ConfigError> {
        if !chunk_size.is_finite() || chunk_size <= 0.0 {
            return Err(ConfigError::InvalidChunkSize(chunk_size));
        }
        if window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(window_size));
        }

        Ok(Self {
            chunk_size,
            window_size,
            salt,
            catalog,
        })
    }

    pub fn from_file(file: GenerationFile) -> Result<Self, ConfigError> {
        let catalog = ContentCatalog::new(file.catalog)?;
        Self::new(file.chunk_size, file.window.cells(), file.salt, catalog)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let file: GenerationFile =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_ron_str(&text)
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn salt(&self) -> i32 {
        self.salt
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }
}
