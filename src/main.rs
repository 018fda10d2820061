use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use design2code::ai::{mime, CompletionService, MockCompletionClient, OpenAiCompletionClient};
use design2code::export::{self, ClipboardWriter, SystemClipboard};
use design2code::input::{self, ClipboardItem, InputSurface, SelectedFile};
use design2code::models::{Config, ConversionState};
use design2code::Converter;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "design2code")]
#[command(about = "Generate component code from a UI design export or screenshot")]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["image", "design", "text", "stdin"])
))]
struct CliArgs {
    /// Screenshot or mockup image to convert.
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Design-tool export (e.g. JSON) to convert.
    #[arg(long, value_name = "PATH")]
    design: Option<PathBuf>,

    /// Design description passed inline.
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Read pasted data from stdin; images are detected by signature.
    #[arg(long)]
    stdin: bool,

    /// Write the generated code to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also copy the generated code to the system clipboard.
    #[arg(long)]
    copy: bool,

    /// Override the vision model.
    #[arg(long, value_name = "MODEL")]
    vision_model: Option<String>,

    /// Override the text model.
    #[arg(long, value_name = "MODEL")]
    text_model: Option<String>,

    /// Override the completion service base URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Use a canned offline reply instead of calling the service.
    #[arg(long)]
    dry_run: bool,
}

fn apply_overrides(mut config: Config, args: &CliArgs) -> Config {
    if let Some(model) = &args.vision_model {
        config.models.vision_model = model.clone();
    }
    if let Some(model) = &args.text_model {
        config.models.text_model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    config
}

/// Offer stdin bytes as a pasted clipboard entry.
fn paste_bytes(surface: &mut InputSurface, bytes: Vec<u8>) -> Result<()> {
    match mime::sniff_image_mime(&bytes) {
        Some(image_mime) => {
            surface.paste_clipboard_items(vec![ClipboardItem::new(image_mime, bytes)]);
        }
        None => {
            // Not an image, so the paste is ordinary text input.
            let text =
                String::from_utf8(bytes).context("stdin is neither an image nor UTF-8 text")?;
            surface.set_structured_text(text);
        }
    }
    Ok(())
}

async fn acquire_input(args: &CliArgs) -> Result<InputSurface> {
    let mut surface = InputSurface::new();

    if let Some(path) = &args.image {
        surface.select_file(SelectedFile::new(path.clone()));
    } else if let Some(path) = &args.design {
        let content = input::read_design_export(path)
            .await
            .with_context(|| format!("Failed to read design export {}", path.display()))?;
        surface.set_structured_text(content);
    } else if let Some(text) = &args.text {
        surface.set_structured_text(text.clone());
    } else if args.stdin {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        paste_bytes(&mut surface, bytes)?;
    }

    Ok(surface)
}

fn export_code(
    code: &str,
    output: Option<&Path>,
    clipboard: Option<&mut dyn ClipboardWriter>,
) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", code))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote generated code to {}", path.display());
        }
        None => println!("{}", code),
    }
    if let Some(clipboard) = clipboard {
        export::copy_code(code, clipboard).context("Failed to copy generated code")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "design2code=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = apply_overrides(Config::from_env()?, &args);

    let service: Box<dyn CompletionService> = if args.dry_run {
        info!("DRY_RUN enabled: the completion service will not be contacted");
        Box::new(MockCompletionClient::new())
    } else {
        Box::new(OpenAiCompletionClient::from_config(&config))
    };

    let surface = acquire_input(&args).await?;
    let mut converter = Converter::new(service, config.models.clone());

    match converter.start(surface.modality()).await {
        ConversionState::Completed(code) => {
            let mut system_clipboard = if args.copy {
                Some(SystemClipboard::new().context("Failed to open the system clipboard")?)
            } else {
                None
            };
            let clipboard = system_clipboard
                .as_mut()
                .map(|c| c as &mut dyn ClipboardWriter);
            export_code(code, args.output.as_deref(), clipboard)
        }
        ConversionState::Failed(message) => {
            error!("Conversion failed: {}", message);
            eprintln!("{}", message);
            std::process::exit(1);
        }
        ConversionState::Idle | ConversionState::InProgress => {
            anyhow::bail!("conversion did not reach a terminal state")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design2code::input::InputModality;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["design2code"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_requires_exactly_one_source() {
        assert!(CliArgs::try_parse_from(["design2code"]).is_err());
        assert!(
            CliArgs::try_parse_from(["design2code", "--image", "a.png", "--text", "x"]).is_err()
        );
    }

    #[test]
    fn test_overrides_apply() {
        let args = args(&[
            "--text",
            "x",
            "--vision-model",
            "v",
            "--text-model",
            "t",
            "--base-url",
            "http://localhost:1",
        ]);
        let config = apply_overrides(Config::from_lookup(|_| None).unwrap(), &args);
        assert_eq!(config.models.vision_model, "v");
        assert_eq!(config.models.text_model, "t");
        assert_eq!(config.base_url, "http://localhost:1");
    }

    #[test]
    fn test_paste_bytes_detects_image() {
        let mut surface = InputSurface::new();
        paste_bytes(&mut surface, vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]).unwrap();
        assert!(matches!(surface.modality(), InputModality::Image(_)));
    }

    #[test]
    fn test_paste_bytes_falls_back_to_text() {
        let mut surface = InputSurface::new();
        paste_bytes(&mut surface, b"{\"name\":\"Card\"}".to_vec()).unwrap();
        assert_eq!(
            surface.modality(),
            &InputModality::StructuredText("{\"name\":\"Card\"}".to_string())
        );
    }

    #[test]
    fn test_paste_bytes_rejects_binary_garbage() {
        let mut surface = InputSurface::new();
        assert!(paste_bytes(&mut surface, vec![0xC3, 0x28, 0xA0]).is_err());
    }

    #[tokio::test]
    async fn test_acquire_inline_text() {
        let surface = acquire_input(&args(&["--text", "{}"])).await.unwrap();
        assert_eq!(
            surface.modality(),
            &InputModality::StructuredText("{}".to_string())
        );
    }

    #[test]
    fn test_export_code_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Component.jsx");
        export_code("<div />", Some(&path), None).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<div />\n");
    }

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Vec<String>,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> design2code::Result<()> {
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_flag_parses() {
        assert!(args(&["--text", "x", "--copy"]).copy);
        assert!(!args(&["--text", "x"]).copy);
    }

    #[test]
    fn test_export_code_copies_to_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Component.jsx");
        let mut clipboard = RecordingClipboard::default();
        export_code("<Card />", Some(&path), Some(&mut clipboard)).unwrap();
        assert_eq!(clipboard.writes, vec!["<Card />"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<Card />\n");
    }
}
