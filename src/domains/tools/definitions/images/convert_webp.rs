//! Convert to WebP tool definition.
//!
//! Converts every PNG/JPEG image directly inside a directory to a lossy WebP
//! file written next to the original. A failure on one image is recorded in
//! the results and the remaining images are still converted.

use image::DynamicImage;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::config::Config;
use crate::core::context::ServerContext;
use crate::core::security::validate_path;
use crate::domains::tools::diagnostics::{DiagnosticsSnapshot, collect_diagnostics};
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::response::{ToolFault, error_result, json_success};

/// WebP encoder quality (0-100).
pub const WEBP_QUALITY: f32 = 80.0;

/// Extensions selected for conversion, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the WebP conversion tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConvertWebpParams {
    /// Directory containing the images to convert (not searched recursively).
    #[serde(alias = "absolutePathToProjectDirectory")]
    pub path: String,
}

// ============================================================================
// Structured Output
// ============================================================================

/// A successfully converted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedImage {
    pub original_file: String,
    pub converted_file: String,
    pub original_byte_size: u64,
    pub converted_byte_size: u64,
    pub percent_reduction: i64,
}

/// An image that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedImage {
    pub original_file: String,
    pub error: ToolFault,
}

/// Outcome for a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConversionResult {
    Converted(ConvertedImage),
    Failed(FailedImage),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionReport {
    diagnostics: DiagnosticsSnapshot,
    target_directory: String,
    image_files: Vec<String>,
    conversion_results: Vec<ConversionResult>,
    converted_count: usize,
    failed_count: usize,
    message: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Convert to WebP tool - converts the PNG/JPEG images of a directory.
pub struct ConvertWebpTool {
    config: Arc<Config>,
    context: Arc<ServerContext>,
}

impl ConvertWebpTool {
    pub fn new(config: Arc<Config>, context: Arc<ServerContext>) -> Self {
        Self { config, context }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ConvertWebpTool {
    const NAME: &'static str = "convert_webp";

    const DESCRIPTION: &'static str = "Activate this tool when convert_to_webp is mentioned in \
        the message. Converts the .png, .jpg and .jpeg images directly inside a directory to WebP \
        (quality 80). WARNING: writes a new <name>.webp file next to each image, overwriting any \
        existing file of that name; the originals are left untouched.";

    const READ_ONLY: bool = false;

    type Params = ConvertWebpParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(&self, params: ConvertWebpParams) -> Result<CallToolResult, McpError> {
        info!("Convert to WebP tool called");

        let dir = match target_directory(&params.path, &self.config).await {
            Ok(dir) => dir,
            Err(fault) => return error_result(fault, &self.context).await,
        };

        let image_files = match eligible_images(&dir).await {
            Ok(files) => files,
            Err(e) => return error_result(ToolFault::from_io(&e, &dir), &self.context).await,
        };

        let mut conversion_results = Vec::with_capacity(image_files.len());
        for name in &image_files {
            let result = match convert_file(&dir, name).await {
                Ok(converted) => {
                    info!(
                        "Converted {} -> {} ({}%)",
                        converted.original_file,
                        converted.converted_file,
                        converted.percent_reduction
                    );
                    ConversionResult::Converted(converted)
                }
                Err(fault) => {
                    warn!("Failed to convert {}: {}", name, fault.message);
                    ConversionResult::Failed(FailedImage {
                        original_file: name.clone(),
                        error: fault,
                    })
                }
            };
            conversion_results.push(result);
        }

        let converted_count = conversion_results
            .iter()
            .filter(|r| matches!(r, ConversionResult::Converted(_)))
            .count();
        let failed_count = conversion_results.len() - converted_count;

        let report = ConversionReport {
            diagnostics: collect_diagnostics(&self.context).await,
            target_directory: dir.display().to_string(),
            message: summary_message(&dir, image_files.len(), converted_count, failed_count),
            image_files,
            conversion_results,
            converted_count,
            failed_count,
        };
        json_success(&report)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Whether a file name has one of the supported image extensions.
pub fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// `round((1 - converted / original) * 100)`, halves rounded up. Negative
/// when the WebP file is larger than the original.
pub fn percent_reduction(original: u64, converted: u64) -> i64 {
    if original == 0 {
        return 0;
    }
    let ratio = 1.0 - converted as f64 / original as f64;
    (ratio * 100.0 + 0.5).floor() as i64
}

/// Decode an image and encode it as lossy WebP at [`WEBP_QUALITY`].
pub fn encode_webp(bytes: &[u8]) -> Result<Vec<u8>, ToolFault> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        ToolFault::new(format!("Failed to decode image: {}", e)).with_code("EDECODE")
    })?;

    // The WebP encoder only accepts 8-bit RGB/RGBA buffers.
    let decoded = match decoded {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => decoded,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    };

    let encoder = webp::Encoder::from_image(&decoded).map_err(|e| {
        ToolFault::new(format!("Failed to prepare WebP encoder: {}", e)).with_code("EENCODE")
    })?;
    let encoded = encoder.encode_simple(false, WEBP_QUALITY).map_err(|e| {
        ToolFault::new(format!("Failed to encode WebP: {:?}", e)).with_code("EENCODE")
    })?;
    Ok(encoded.to_vec())
}

async fn target_directory(input: &str, config: &Config) -> Result<PathBuf, ToolFault> {
    let dir = validate_path(input, &config.security)?;
    let metadata = tokio::fs::metadata(&dir)
        .await
        .map_err(|e| ToolFault::from_io(&e, &dir))?;
    if !metadata.is_dir() {
        return Err(ToolFault::new(format!("Path is not a directory: {}", dir.display()))
            .with_code("ENOTDIR")
            .with_path(&dir));
    }
    Ok(dir)
}

/// Names of the regular files in `dir` with a supported extension, sorted.
async fn eligible_images(dir: &Path) -> io::Result<Vec<String>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut images = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if is_supported_image(&name) {
            images.push(name);
        }
    }

    images.sort();
    Ok(images)
}

async fn convert_file(dir: &Path, name: &str) -> Result<ConvertedImage, ToolFault> {
    let input_path = dir.join(name);
    let output_path = input_path.with_extension("webp");

    let input = tokio::fs::read(&input_path)
        .await
        .map_err(|e| ToolFault::from_io(&e, &input_path))?;
    let original_byte_size = input.len() as u64;

    let output = tokio::task::spawn_blocking(move || encode_webp(&input))
        .await
        .map_err(|e| {
            ToolFault::new(format!("Conversion task failed: {}", e))
                .with_code("ETASK")
                .with_path(&input_path)
        })?
        .map_err(|fault| fault.with_path(&input_path))?;

    tokio::fs::write(&output_path, &output)
        .await
        .map_err(|e| ToolFault::from_io(&e, &output_path))?;

    let converted_byte_size = output.len() as u64;
    let converted_file = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ConvertedImage {
        original_file: name.to_string(),
        converted_file,
        original_byte_size,
        converted_byte_size,
        percent_reduction: percent_reduction(original_byte_size, converted_byte_size),
    })
}

fn summary_message(dir: &Path, total: usize, converted: usize, failed: usize) -> String {
    if total == 0 {
        format!(
            "No eligible image files (.png, .jpg, .jpeg) found in {}.",
            dir.display()
        )
    } else if failed == 0 {
        format!("Successfully converted {} image(s) to WebP.", converted)
    } else {
        format!(
            "Converted {} of {} image(s) to WebP; {} failed.",
            converted, total, failed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::response::result_text;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn tool() -> ConvertWebpTool {
        ConvertWebpTool::new(Arc::new(Config::default()), Arc::new(ServerContext::default()))
    }

    fn write_image(path: &Path, format: ImageFormat) {
        let img = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
        img.save_with_format(path, format).unwrap();
    }

    async fn run(dir: &Path) -> (CallToolResult, serde_json::Value) {
        let result = tool()
            .execute(ConvertWebpParams {
                path: dir.to_string_lossy().to_string(),
            })
            .await
            .unwrap();
        let json = serde_json::from_str(result_text(&result)).unwrap();
        (result, json)
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image("a.png"));
        assert!(is_supported_image("a.PNG"));
        assert!(is_supported_image("b.jpg"));
        assert!(is_supported_image("c.JpEg"));
        assert!(!is_supported_image("photo.GIF"));
        assert!(!is_supported_image("a.webp"));
        assert!(!is_supported_image("png"));
        assert!(!is_supported_image(".png"));
    }

    #[test]
    fn test_percent_reduction() {
        assert_eq!(percent_reduction(100, 80), 20);
        assert_eq!(percent_reduction(3, 2), 33);
        assert_eq!(percent_reduction(100, 100), 0);
        assert_eq!(percent_reduction(100, 150), -50);
        assert_eq!(percent_reduction(0, 10), 0);
    }

    #[test]
    fn test_encode_rejects_garbage() {
        let fault = encode_webp(b"definitely not an image").unwrap_err();
        assert_eq!(fault.code.as_deref(), Some("EDECODE"));
    }

    #[test]
    fn test_encode_rejects_oversized_image() {
        // WebP caps each dimension at 16383 pixels.
        let img = RgbImage::new(16_400, 1);
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();

        let fault = encode_webp(bytes.get_ref()).unwrap_err();
        assert_eq!(fault.code.as_deref(), Some("EENCODE"));
        assert!(fault.message.contains("BAD_DIMENSION"));
    }

    #[tokio::test]
    async fn test_oversized_image_reported_as_failure() {
        let temp_dir = TempDir::new().unwrap();
        RgbImage::new(16_400, 1)
            .save_with_format(temp_dir.path().join("wide.png"), ImageFormat::Png)
            .unwrap();

        let (result, json) = run(temp_dir.path()).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(json["failedCount"], 1);
        assert_eq!(json["conversionResults"][0]["error"]["code"], "EENCODE");
        assert!(!temp_dir.path().join("wide.webp").exists());
    }

    #[tokio::test]
    async fn test_converts_png_alongside_original() {
        let temp_dir = TempDir::new().unwrap();
        let png = temp_dir.path().join("a.png");
        write_image(&png, ImageFormat::Png);
        let original_bytes = fs::read(&png).unwrap();

        let (result, json) = run(temp_dir.path()).await;

        assert_eq!(result.is_error, Some(false));
        assert!(temp_dir.path().join("a.webp").is_file());
        assert_eq!(fs::read(&png).unwrap(), original_bytes);

        let entry = &json["conversionResults"][0];
        assert_eq!(entry["originalFile"], "a.png");
        assert_eq!(entry["convertedFile"], "a.webp");
        assert_eq!(entry["originalByteSize"], original_bytes.len() as u64);

        let converted = fs::metadata(temp_dir.path().join("a.webp")).unwrap().len();
        assert_eq!(entry["convertedByteSize"], converted);
        assert_eq!(
            entry["percentReduction"],
            percent_reduction(original_bytes.len() as u64, converted)
        );
        assert_eq!(json["convertedCount"], 1);
        assert_eq!(json["message"], "Successfully converted 1 image(s) to WebP.");
    }

    #[tokio::test]
    async fn test_only_supported_extensions_selected() {
        let temp_dir = TempDir::new().unwrap();
        write_image(&temp_dir.path().join("b.JPG"), ImageFormat::Jpeg);
        write_image(&temp_dir.path().join("c.jpeg"), ImageFormat::Jpeg);
        fs::write(temp_dir.path().join("photo.GIF"), b"GIF89a").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "text").unwrap();
        fs::create_dir(temp_dir.path().join("nested.png")).unwrap();

        let (_, json) = run(temp_dir.path()).await;

        assert_eq!(json["imageFiles"], serde_json::json!(["b.JPG", "c.jpeg"]));
        assert_eq!(json["convertedCount"], 2);
        assert!(temp_dir.path().join("b.webp").is_file());
        assert!(temp_dir.path().join("c.webp").is_file());
        assert!(!temp_dir.path().join("photo.webp").exists());
    }

    #[tokio::test]
    async fn test_empty_directory_reports_none_found() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("readme.md"), "# hi").unwrap();

        let (result, json) = run(temp_dir.path()).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(json["conversionResults"], serde_json::json!([]));
        assert!(json["message"].as_str().unwrap().starts_with("No eligible image files"));
        assert!(json["diagnostics"]["currentDirectoryEntries"].is_array());
    }

    #[tokio::test]
    async fn test_corrupt_image_does_not_abort_batch() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a_broken.png"), b"not a png").unwrap();
        write_image(&temp_dir.path().join("b_good.png"), ImageFormat::Png);

        let (result, json) = run(temp_dir.path()).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(json["convertedCount"], 1);
        assert_eq!(json["failedCount"], 1);

        let failed = &json["conversionResults"][0];
        assert_eq!(failed["originalFile"], "a_broken.png");
        assert_eq!(failed["error"]["code"], "EDECODE");
        assert!(failed.get("convertedFile").is_none());

        assert_eq!(json["conversionResults"][1]["convertedFile"], "b_good.webp");
        assert!(!temp_dir.path().join("a_broken.webp").exists());
        assert_eq!(json["message"], "Converted 1 of 2 image(s) to WebP; 1 failed.");
    }

    #[tokio::test]
    async fn test_missing_directory_returns_error_payload() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let (result, json) = run(&missing).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(json["error"]["code"], "ENOENT");
        assert!(json["error"]["diagnostics"]["currentDirectoryEntries"].is_array());
    }

    #[tokio::test]
    async fn test_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        let png = temp_dir.path().join("a.png");
        write_image(&png, ImageFormat::Png);

        let (result, json) = run(&png).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(json["error"]["code"], "ENOTDIR");
    }

    #[test]
    fn test_legacy_field_name_accepted() {
        let params: ConvertWebpParams = serde_json::from_value(serde_json::json!({
            "absolutePathToProjectDirectory": "/srv/site/images",
            "relativePathToProjectDirectory": "images"
        }))
        .unwrap();
        assert_eq!(params.path, "/srv/site/images");
    }
}
