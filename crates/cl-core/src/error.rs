use thiserror::Error;

/// Errors originating from the core module.
///
/// Numeric conversions never fail: out-of-range inputs are clamped and
/// degenerate geometry resolves to a documented convention. Only parsing at
/// the boundary (hex strings, names, raster sizes) reports errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// A color string that is not `#rrggbb`, `rrggbb` or `#rgb`.
    #[error("Couleur hex invalide : {input:?}")]
    InvalidHex {
        /// The rejected input.
        input: String,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A name that does not match any variant of an enumerated option.
    #[error("Valeur inconnue pour {kind} : {value}")]
    UnknownVariant {
        /// Option being parsed ("mix mode", "marker kind", ...).
        kind: &'static str,
        /// The rejected name.
        value: String,
    },
}
