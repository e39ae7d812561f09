use super::ConfigError;

/// Per-axis scale applied to the unit quad before the camera transform.
///
/// Both components are finite and strictly positive; this is checked once,
/// when the image is bound, so per-frame code can rely on it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageScale {
    x: f32,
    y: f32,
}

impl ImageScale {
    pub const UNIT: ImageScale = ImageScale { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(x) && valid(y) {
            Ok(Self { x, y })
        } else {
            Err(ConfigError::InvalidImageScale { x, y })
        }
    }

    /// Scale that keeps the image's aspect ratio with its longest side at 1.0.
    ///
    /// Wide images get `(1, h/w)`, tall images `(w/h, 1)`.
    pub fn fit(width: u32, height: u32) -> Result<Self, ConfigError> {
        let aspect = aspect_of(width, height)?;
        if aspect > 1.0 {
            Self::new(1.0, 1.0 / aspect)
        } else {
            Self::new(aspect, 1.0)
        }
    }

    /// Height-normalized scale `(w/h, 1)`.
    pub fn from_aspect(width: u32, height: u32) -> Result<Self, ConfigError> {
        Self::new(aspect_of(width, height)?, 1.0)
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Default for ImageScale {
    fn default() -> Self {
        Self::UNIT
    }
}

fn aspect_of(width: u32, height: u32) -> Result<f32, ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::EmptyImage { width, height });
    }
    Ok(width as f32 / height as f32)
}
