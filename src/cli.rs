use crate::config::{load_options, DisplayMode, FretNumbering, OutlineWeight, ScalePreset};
use crate::service::{DiagramService, StoreSources};
use crate::store::TemplateImage;
use crate::surface::write_output_svg;
#[cfg(feature = "png")]
use crate::surface::write_output_png;
use crate::table::ChordEntry;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chordgrid", version, about = "Chord diagram renderer (template compositing)")]
pub struct Args {
    /// Template dictionary JSON (crop_rects/frets/barres/notes)
    #[arg(short = 't', long = "template")]
    pub template: PathBuf,

    /// Chord table JSON (chords/ram/note)
    #[arg(short = 'd', long = "chords")]
    pub chords: PathBuf,

    /// Background template image referenced from the SVG
    #[arg(long = "image")]
    pub image: Option<PathBuf>,

    /// Template image width in pixels
    #[arg(long = "imageWidth", default_value_t = 1000)]
    pub image_width: u32,

    /// Template image height in pixels
    #[arg(long = "imageHeight", default_value_t = 800)]
    pub image_height: u32,

    /// Chord to render, e.g. "Am1"
    #[arg(short = 'n', long = "chord")]
    pub chord: Option<String>,

    /// Display mode
    #[arg(short = 'm', long = "mode", value_enum, default_value = "fingers")]
    pub mode: DisplayMode,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Render options JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override: fret numbering
    #[arg(long = "fretNumbering", value_enum)]
    pub fret_numbering: Option<FretNumbering>,

    /// Override: barre outline weight
    #[arg(long = "barreOutline", value_enum)]
    pub barre_outline: Option<OutlineWeight>,

    /// Override: note outline weight
    #[arg(long = "noteOutline", value_enum)]
    pub note_outline: Option<OutlineWeight>,

    /// Override: output scale preset
    #[arg(long = "scale", value_enum)]
    pub scale: Option<ScalePreset>,

    /// Print the chord groups and exit
    #[arg(long = "listGroups")]
    pub list_groups: bool,

    /// Print the chords of one group and exit
    #[arg(long = "listChords")]
    pub list_chords: Option<String>,

    /// Write the full configuration bundle to this path and exit
    #[arg(long = "export")]
    pub export: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let mut options = load_options(args.config.as_deref())?;
    if let Some(v) = args.fret_numbering {
        options.fret_numbering = v;
    }
    if let Some(v) = args.barre_outline {
        options.barre_outline = v;
    }
    if let Some(v) = args.note_outline {
        options.note_outline = v;
    }
    if let Some(v) = args.scale {
        options.scale = v;
    }

    let image = match &args.image {
        Some(path) => TemplateImage::with_source(args.image_width, args.image_height, path),
        None => TemplateImage::new(args.image_width, args.image_height),
    };
    let service = DiagramService::load(StoreSources {
        template_path: args.template.clone(),
        chord_path: args.chords.clone(),
        image,
    })?;

    if args.list_groups {
        for group in service.groups() {
            println!("{group}");
        }
        return Ok(());
    }

    if let Some(group) = &args.list_chords {
        for entry in service.chords_in_group(group) {
            println!("{}", entry.name);
        }
        return Ok(());
    }

    if let Some(path) = &args.export {
        let bundle = service.export_configuration(&options);
        std::fs::write(path, serde_json::to_string_pretty(&bundle)?)?;
        return Ok(());
    }

    let Some(chord_name) = args.chord.as_deref() else {
        return Err(anyhow::anyhow!(
            "Nothing to do: pass --chord, --listGroups, --listChords or --export"
        ));
    };
    let entry = find_chord(&service, chord_name)
        .ok_or_else(|| anyhow::anyhow!("Chord not found: {chord_name}"))?;

    let svg = service.render_chord(&entry.row, args.mode, &options)?;
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let output = args
                    .output
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
                write_output_png(&svg, output)?;
            }
            #[cfg(not(feature = "png"))]
            {
                return Err(anyhow::anyhow!("png output requires the `png` feature"));
            }
        }
    }

    Ok(())
}

/// Finds a chord entry by its full display name ("Am1"). The group is
/// derived from the name's letters, so only one group is scanned.
fn find_chord(service: &DiagramService, name: &str) -> Option<ChordEntry> {
    let group = crate::table::group_of(name);
    service
        .chords_in_group(&group)
        .into_iter()
        .find(|entry| entry.name == name)
}
