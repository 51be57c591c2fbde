//! Image node layout attributes.
//!
//! Width is stored as a percentage of the editor column, height as the pixel
//! value that keeps the original aspect ratio at that width. Alignment decides
//! between block-centering and floating.

use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_WIDTH: &str = "100%";
const DEFAULT_HEIGHT: &str = "auto";

/// Horizontal placement of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    fn margin(self) -> &'static str {
        match self {
            Alignment::Center => "0 auto",
            Alignment::Left | Alignment::Right => "0",
        }
    }

    fn float(self) -> &'static str {
        match self {
            Alignment::Center => "none",
            Alignment::Left => "left",
            Alignment::Right => "right",
        }
    }
}

/// Resize presets offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    Full,
}

impl SizePreset {
    /// Width as a percentage of the container.
    pub fn percent(self) -> u32 {
        match self {
            SizePreset::Small => 25,
            SizePreset::Medium => 50,
            SizePreset::Large => 75,
            SizePreset::Full => 100,
        }
    }
}

/// Attributes of an `image` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttrs {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_width", deserialize_with = "width_or_default")]
    pub width: String,
    #[serde(default = "default_height", deserialize_with = "height_or_default")]
    pub height: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alignment: Alignment,
}

impl ImageAttrs {
    /// A freshly inserted image: full width, natural height, centered.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            title: None,
            width: default_width(),
            height: default_height(),
            alignment: Alignment::Center,
        }
    }

    /// Apply a size preset for an editor column `container_width` pixels wide.
    ///
    /// Returns `false` and leaves the attributes untouched when the aspect
    /// ratio is unknown (zero, negative or not finite).
    pub fn resize(&mut self, preset: SizePreset, container_width: f64, aspect_ratio: f64) -> bool {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 || !container_width.is_finite() {
            return false;
        }

        let percent = preset.percent();
        let numeric_width = f64::from(percent) * container_width / 100.0;
        self.width = format!("{}%", percent);
        self.height = format!("{}px", numeric_width / aspect_ratio);
        true
    }

    pub fn align(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    /// Inline CSS used when the image is displayed.
    pub fn style(&self) -> String {
        format!(
            "width: {}; height: {}; display: block; margin: {}; float: {};",
            self.width,
            self.height,
            self.alignment.margin(),
            self.alignment.float()
        )
    }
}

fn default_width() -> String {
    DEFAULT_WIDTH.to_string()
}

fn default_height() -> String {
    DEFAULT_HEIGHT.to_string()
}

// Editors persist unset attributes as `null`; treat those like absent ones.

fn width_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_width))
}

fn height_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_height))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
