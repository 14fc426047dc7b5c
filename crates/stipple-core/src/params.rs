use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, NoiseResult};
use crate::fractal::NormalizationMode;

/// Noise algorithm as presented to the user.
///
/// Several labels share one kernel: `Perlin`, `Worley` and `Cellular` render
/// with the gradient kernel exactly like `Gradient` does. See [`NOISE_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseType {
    #[serde(alias = "simplex")]
    Gradient,
    Perlin,
    Worley,
    Cellular,
    White,
    Value,
}

/// Concrete kernel implementations behind the [`NoiseType`] labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    Gradient,
    White,
    Value,
}

/// Label → (noise type, kernel). Parsing and kernel selection both read this.
pub const NOISE_LABELS: &[(&str, NoiseType, KernelKind)] = &[
    ("gradient", NoiseType::Gradient, KernelKind::Gradient),
    ("simplex",  NoiseType::Gradient, KernelKind::Gradient),
    ("perlin",   NoiseType::Perlin,   KernelKind::Gradient),
    ("worley",   NoiseType::Worley,   KernelKind::Gradient),
    ("cellular", NoiseType::Cellular, KernelKind::Gradient),
    ("white",    NoiseType::White,    KernelKind::White),
    ("value",    NoiseType::Value,    KernelKind::Value),
];

impl NoiseType {
    pub const ALL: [NoiseType; 6] = [
        NoiseType::Gradient,
        NoiseType::Perlin,
        NoiseType::Worley,
        NoiseType::Cellular,
        NoiseType::White,
        NoiseType::Value,
    ];

    /// The kernel this label renders with.
    pub fn kernel(self) -> KernelKind {
        NOISE_LABELS
            .iter()
            .find(|(_, ty, _)| *ty == self)
            .map(|&(_, _, kind)| kind)
            .unwrap_or(KernelKind::Gradient)
    }

    pub fn label(self) -> &'static str {
        match self {
            NoiseType::Gradient => "gradient",
            NoiseType::Perlin   => "perlin",
            NoiseType::Worley   => "worley",
            NoiseType::Cellular => "cellular",
            NoiseType::White    => "white",
            NoiseType::Value    => "value",
        }
    }
}

impl FromStr for NoiseType {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        NOISE_LABELS
            .iter()
            .find(|(label, _, _)| *label == key)
            .map(|&(_, ty, _)| ty)
            .ok_or_else(|| NoiseError::validation(format!("unknown noise type '{s}'")))
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Octave compositing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalType {
    None,
    Fbm,
    Billow,
    Ridged,
    Turbulence,
    Iq,
}

impl FractalType {
    pub const ALL: [FractalType; 6] = [
        FractalType::None,
        FractalType::Fbm,
        FractalType::Billow,
        FractalType::Ridged,
        FractalType::Turbulence,
        FractalType::Iq,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FractalType::None       => "none",
            FractalType::Fbm        => "fbm",
            FractalType::Billow     => "billow",
            FractalType::Ridged     => "ridged",
            FractalType::Turbulence => "turbulence",
            FractalType::Iq         => "iq",
        }
    }
}

impl FromStr for FractalType {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        FractalType::ALL
            .into_iter()
            .find(|ty| ty.label() == key)
            .ok_or_else(|| NoiseError::validation(format!("unknown fractal type '{s}'")))
    }
}

impl fmt::Display for FractalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png  => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            OutputFormat::Png  => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_start_matches("image/") {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            _ => Err(NoiseError::validation(format!("unsupported output format '{s}'"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_extension())
    }
}

/// Low end of the colour ramp. Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = NoiseError;

    /// Accepts `#rrggbb`, `rrggbb`, `#rgb` and `rgb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || NoiseError::validation(format!("invalid colour '{s}', expected #rrggbb"));
        if !hex.is_ascii() {
            return Err(bad());
        }
        let digits: Vec<u8> = match hex.len() {
            6 => (0..3)
                .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16))
                .collect::<Result<_, _>>()
                .map_err(|_| bad())?,
            3 => (0..3)
                .map(|i| u8::from_str_radix(&hex[i..i + 1], 16).map(|d| d * 17))
                .collect::<Result<_, _>>()
                .map_err(|_| bad())?,
            _ => return Err(bad()),
        };
        Ok(Color::new(digits[0], digits[1], digits[2]))
    }
}

impl TryFrom<String> for Color {
    type Error = NoiseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Full parameter set for one generation request.
///
/// Keys are camelCase to match the UI's settings documents; missing keys
/// fall back to [`NoiseParameters::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoiseParameters {
    pub width: u32,
    pub height: u32,
    pub seed: u32,
    /// Spatial scale of the base octave.
    pub frequency: f64,
    /// Vertical scale of the base octave before normalization.
    pub amplitude: f64,
    pub noise_type: NoiseType,
    pub fractal_type: FractalType,
    #[serde(rename = "domainWrap", alias = "domainWarp")]
    pub domain_warp: bool,
    /// Ignored when `fractal_type` is `None`.
    pub octaves: u32,
    /// Amplitude decay per octave, (0, 1].
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
    pub background_color: Color,
    pub output_format: OutputFormat,
    /// Compression factor in [0, 1]; ignored by lossless formats.
    pub quality: f32,
    pub normalization: NormalizationMode,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: 0,
            frequency: 0.02,
            amplitude: 1.0,
            noise_type: NoiseType::Gradient,
            fractal_type: FractalType::Fbm,
            domain_warp: false,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            background_color: Color::BLACK,
            output_format: OutputFormat::Png,
            quality: 0.90,
            normalization: NormalizationMode::Approximate,
        }
    }
}

impl NoiseParameters {
    /// Parse a (possibly partial) JSON parameter document.
    pub fn from_json(json: &str) -> NoiseResult<Self> {
        serde_json::from_str(json).map_err(|e| NoiseError::validation(format!("invalid parameters: {e}")))
    }

    pub fn to_json_pretty(&self) -> NoiseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| NoiseError::validation(e.to_string()))
    }

    /// Octaves actually evaluated: a single one when compositing is off.
    pub fn effective_octaves(&self) -> u32 {
        match self.fractal_type {
            FractalType::None => 1,
            _ => self.octaves,
        }
    }

    /// Reject anything that would make the pipeline ill-defined.
    /// Runs before any table or pixel is computed.
    pub fn validate(&self) -> NoiseResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(NoiseError::validation(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fractal_type != FractalType::None && self.octaves == 0 {
            return Err(NoiseError::validation(format!(
                "octaves must be at least 1 for fractal type '{}'",
                self.fractal_type
            )));
        }
        positive("frequency", self.frequency)?;
        positive("amplitude", self.amplitude)?;
        positive("lacunarity", self.lacunarity)?;
        if !self.persistence.is_finite() || self.persistence <= 0.0 || self.persistence > 1.0 {
            return Err(NoiseError::validation(format!(
                "persistence must lie in (0, 1], got {}",
                self.persistence
            )));
        }
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(NoiseError::validation(format!(
                "quality must lie in [0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Default file name for the encoded artifact.
    pub fn suggested_file_name(&self) -> String {
        format!("noise-{}.{}", self.seed, self.output_format.file_extension())
    }
}

fn positive(name: &str, v: f64) -> NoiseResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(NoiseError::validation(format!("{name} must be a positive finite number, got {v}")))
    }
}
