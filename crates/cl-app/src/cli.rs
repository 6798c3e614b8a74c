use std::path::PathBuf;

use cl_core::config::{MarkerKind, MixMode};
use cl_plot::PaletteKind;
use clap::{Parser, Subcommand, ValueEnum};

/// chromalab : colour-space explorer and raster generator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mélanger deux couleurs hexadécimales.
    Mix {
        /// Première couleur (#rrggbb, rrggbb ou #rgb).
        color_a: String,
        /// Seconde couleur.
        color_b: String,
        /// additive, subtractive ou overprint. Défaut : [mixer].mode.
        #[arg(long)]
        mode: Option<MixMode>,
        /// Sortie JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Position, guides et couleurs du marqueur dans le cylindre HSV.
    Marker {
        /// Teinte en degrés. Défaut : [marker].hue_deg.
        #[arg(long, allow_negative_numbers = true)]
        hue: Option<f64>,
        /// Valeur [0, 1].
        #[arg(long)]
        value: Option<f64>,
        /// Fraction du rayon (saturation) [0, 1].
        #[arg(long)]
        radius: Option<f64>,
        /// sphere, plane ou circle.
        #[arg(long)]
        kind: Option<MarkerKind>,
        /// Sortie JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rastériser une vue en PNG.
    Render {
        #[arg(value_enum)]
        target: RenderTarget,
        /// Fichier PNG de sortie.
        #[arg(short, long)]
        output: PathBuf,
        /// Grille de palette : hs ou rg.
        #[arg(long, default_value = "hs")]
        palette: PaletteKind,
        /// Teinte de l'aperçu S × V. Défaut : [marker].hue_deg.
        #[arg(long, allow_negative_numbers = true)]
        hue: Option<f64>,
        /// Mode de la lentille. Défaut : [mixer].mode.
        #[arg(long)]
        mode: Option<MixMode>,
        /// Images d'animation avant capture (spectrum, lens).
        #[arg(long, default_value_t = 0)]
        frames: u32,
        /// Couleurs à placer sur le diagramme (#rrggbb).
        #[arg(long = "mark", value_name = "HEX")]
        marks: Vec<String>,
    },
    /// Exporter les sommets colorés d'un solide en JSON.
    Solid {
        #[arg(value_enum)]
        kind: SolidKind,
        /// Fichier de sortie. Défaut : stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Explorateur interactif dans le terminal.
    Explore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderTarget {
    /// Diagramme de chromaticité CIE 1931.
    Diagram,
    /// Spectre visible et onde.
    Spectrum,
    /// Réponse des cônes et bâtonnets.
    Cones,
    /// Grille de nuancier.
    Palette,
    /// Aperçu saturation × valeur.
    Preview,
    /// Lentille du mélangeur.
    Lens,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolidKind {
    /// Cylindre HSV : paroi et couvercles.
    Hsv,
    /// Cube RGB.
    Rgb,
    /// Anneau de teinte.
    Ring,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_parses_mode_names() {
        let cli = Cli::try_parse_from(["chromalab", "mix", "#f00", "00ff00", "--mode", "overprint", "--json"]).unwrap();
        match cli.command {
            Command::Mix { color_a, color_b, mode, json } => {
                assert_eq!((color_a.as_str(), color_b.as_str()), ("#f00", "00ff00"));
                assert_eq!(mode, Some(MixMode::Overprint));
                assert!(json);
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["chromalab", "mix", "#f00", "#0f0", "--mode", "glaze"]).is_err());
    }

    #[test]
    fn render_takes_marks_and_global_config() {
        let cli = Cli::try_parse_from([
            "chromalab", "render", "diagram", "-o", "out.png", "--mark", "#ff0000", "--mark", "#808080", "--config", "lab.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("lab.toml"));
        match cli.command {
            Command::Render { target, marks, palette, .. } => {
                assert_eq!(target, RenderTarget::Diagram);
                assert_eq!(marks.len(), 2);
                assert_eq!(palette, PaletteKind::HueLightness);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn marker_accepts_negative_hue() {
        let cli = Cli::try_parse_from(["chromalab", "marker", "--hue", "-30", "--kind", "circle"]).unwrap();
        match cli.command {
            Command::Marker { hue, kind, .. } => {
                assert_eq!(hue, Some(-30.0));
                assert_eq!(kind, Some(MarkerKind::Circle));
            }
            other => panic!("{other:?}"),
        }
    }
}
