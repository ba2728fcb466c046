//! Generation request model and validation.
//!
//! A [`GenerationRequest`] is validated in full before the client crate
//! issues any network call; the remote service's documented parameter
//! ranges are enforced here.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Face count limits
// ---------------------------------------------------------------------------

/// Minimum face count the remote service accepts.
pub const FACE_COUNT_MIN: u32 = 40_000;
/// Maximum face count the remote service accepts.
pub const FACE_COUNT_MAX: u32 = 1_500_000;
/// Default face count when the host does not specify one.
pub const FACE_COUNT_DEFAULT: u32 = 500_000;

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 1024;

// ---------------------------------------------------------------------------
// Generate type
// ---------------------------------------------------------------------------

/// Generation mode offered by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateType {
    #[default]
    Normal,
    LowPoly,
    Geometry,
    Sketch,
}

impl GenerateType {
    /// Wire name expected by the remote API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::LowPoly => "LowPoly",
            Self::Geometry => "Geometry",
            Self::Sketch => "Sketch",
        }
    }

    /// Parse from the wire name, returning an error for unknown values.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "Normal" => Ok(Self::Normal),
            "LowPoly" => Ok(Self::LowPoly),
            "Geometry" => Ok(Self::Geometry),
            "Sketch" => Ok(Self::Sketch),
            other => Err(CoreError::Validation(format!(
                "Unknown generate type '{other}'. Must be one of: Normal, LowPoly, Geometry, Sketch"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Polygon type
// ---------------------------------------------------------------------------

/// Polygon topology for low-poly output. Ignored by the other modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonType {
    #[default]
    Triangle,
    Quadrilateral,
}

impl PolygonType {
    /// Wire name expected by the remote API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Quadrilateral => "quadrilateral",
        }
    }

    /// Parse from the wire name, returning an error for unknown values.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "triangle" => Ok(Self::Triangle),
            "quadrilateral" => Ok(Self::Quadrilateral),
            other => Err(CoreError::Validation(format!(
                "Unknown polygon type '{other}'. Must be one of: triangle, quadrilateral"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Generation input
// ---------------------------------------------------------------------------

/// What the model is generated from: a text prompt or an encoded image.
#[derive(Debug, Clone)]
pub enum GenerationInput {
    /// Free-text description of the desired model.
    Text { prompt: String },
    /// Base64-encoded image payload (JPEG or PNG bytes).
    Image { payload: String },
}

impl GenerationInput {
    /// Short label for progress output and filenames.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text_to_3d",
            Self::Image { .. } => "image_to_3d",
        }
    }

    /// The text used to derive the artifact slug: the prompt itself for
    /// text input, a fixed label for image input.
    pub fn slug_source(&self) -> &str {
        match self {
            Self::Text { prompt } => prompt,
            Self::Image { .. } => "image_to_3d",
        }
    }
}

// ---------------------------------------------------------------------------
// Generation request
// ---------------------------------------------------------------------------

/// A fully-specified generation request, validated before submission.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub input: GenerationInput,
    pub enable_pbr: bool,
    pub face_count: u32,
    pub generate_type: GenerateType,
    pub polygon_type: PolygonType,
}

impl GenerationRequest {
    /// Build a text-to-3D request with documented defaults.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            input: GenerationInput::Text {
                prompt: prompt.into(),
            },
            enable_pbr: false,
            face_count: FACE_COUNT_DEFAULT,
            generate_type: GenerateType::Normal,
            polygon_type: PolygonType::Triangle,
        }
    }

    /// Build an image-to-3D request from an already-encoded payload.
    pub fn image(payload: impl Into<String>) -> Self {
        Self {
            input: GenerationInput::Image {
                payload: payload.into(),
            },
            enable_pbr: false,
            face_count: FACE_COUNT_DEFAULT,
            generate_type: GenerateType::Normal,
            polygon_type: PolygonType::Triangle,
        }
    }

    /// Validate the whole request. Called by the client before any network
    /// call so bad input never reaches the remote service.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_face_count(self.face_count)?;
        match &self.input {
            GenerationInput::Text { prompt } => validate_prompt(prompt),
            GenerationInput::Image { payload } => {
                if payload.is_empty() {
                    Err(CoreError::Validation(
                        "Image payload must not be empty".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that a face count is within the documented range.
pub fn validate_face_count(face_count: u32) -> Result<(), CoreError> {
    if !(FACE_COUNT_MIN..=FACE_COUNT_MAX).contains(&face_count) {
        return Err(CoreError::Validation(format!(
            "face_count {face_count} out of range [{FACE_COUNT_MIN}, {FACE_COUNT_MAX}]"
        )));
    }
    Ok(())
}

/// Validate that a text prompt is non-empty and within length limits.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation(
            "Prompt must not be empty".to_string(),
        ));
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds maximum length of {MAX_PROMPT_CHARS} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
