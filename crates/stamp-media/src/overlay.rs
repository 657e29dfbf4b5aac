//! Drawtext overlay filter construction.
//!
//! Two overlay variants: a static corner watermark, and a moving watermark
//! whose horizontal position is `w - 50*t`, guarded by `if(gte(t,0),...,NAN)`
//! so the text is not drawn before playback start.

use std::path::{Path, PathBuf};

use crate::command::FfmpegCommand;

/// Watermark font size in pixels.
pub const FONT_SIZE: u32 = 24;

/// Watermark font color.
pub const FONT_COLOR: &str = "white";

/// Horizontal speed of the moving watermark, pixels per second.
pub const MOVING_SPEED: u32 = 50;

/// Bottom margin of the moving watermark, pixels.
const MOVING_BOTTOM_MARGIN: u32 = 30;

/// Top-left offset of the static watermark, pixels.
const STATIC_OFFSET: u32 = 10;

/// Escape text for embedding in a drawtext filter expression.
fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Build the drawtext filter for a watermark.
pub fn overlay_filter(text: &str, moving: bool) -> String {
    let escaped = escape_drawtext(text);
    if moving {
        // Scrolls right-to-left along the bottom; NAN hides the text for t<0
        format!(
            "drawtext=text='{escaped}':fontcolor={FONT_COLOR}:fontsize={FONT_SIZE}:\
             x='if(gte(t,0),w-{MOVING_SPEED}*t,NAN)':y=h-{MOVING_BOTTOM_MARGIN}"
        )
    } else {
        format!(
            "drawtext=text='{escaped}':fontcolor={FONT_COLOR}:fontsize={FONT_SIZE}:\
             x={STATIC_OFFSET}:y={STATIC_OFFSET}"
        )
    }
}

/// Derive the artifact path for an input: `<out_dir>/watermarked_<basename>`.
///
/// Callers keep basenames unique by saving uploads under random names.
fn watermarked_output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let basename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    out_dir.join(format!("watermarked_{basename}"))
}

/// Build the watermarking command for a video.
///
/// The audio stream is passed through unmodified and progress reporting is
/// enabled so a monitor can derive percentage completion.
pub fn watermark_video_command(
    input: impl AsRef<Path>,
    watermark_text: &str,
    moving: bool,
    out_dir: impl AsRef<Path>,
) -> (FfmpegCommand, PathBuf) {
    let input = input.as_ref();
    let output = watermarked_output_path(input, out_dir.as_ref());

    let cmd = FfmpegCommand::new(input, &output)
        .video_filter(overlay_filter(watermark_text, moving))
        .audio_codec("copy")
        .with_progress();

    (cmd, output)
}

/// Build the watermarking command for an image (static overlay only).
pub fn watermark_image_command(
    input: impl AsRef<Path>,
    watermark_text: &str,
    out_dir: impl AsRef<Path>,
) -> (FfmpegCommand, PathBuf) {
    let input = input.as_ref();
    let output = watermarked_output_path(input, out_dir.as_ref());

    let cmd = FfmpegCommand::new(input, &output).video_filter(overlay_filter(watermark_text, false));

    (cmd, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_filter_position() {
        let filter = overlay_filter("demo", false);
        assert!(filter.contains("x=10:y=10"));
        assert!(filter.contains("text='demo'"));
        assert!(filter.contains("fontsize=24"));
        assert!(!filter.contains("NAN"));
    }

    #[test]
    fn test_moving_filter_guards_prestart() {
        let filter = overlay_filter("demo", true);
        // On-screen position is w-50*t for t>=0, undefined before start
        assert!(filter.contains("if(gte(t,0),w-50*t,NAN)"));
        assert!(filter.contains("y=h-30"));
    }

    #[test]
    fn test_drawtext_escaping() {
        let filter = overlay_filter("it's 10:30", false);
        assert!(filter.contains("it\\'s 10\\:30"));
    }

    #[test]
    fn test_output_path_prefixes_basename() {
        let (_, output) = watermark_video_command("uploads/abc123.mp4", "wm", false, "watermarked");
        assert_eq!(output, PathBuf::from("watermarked/watermarked_abc123.mp4"));
    }

    #[test]
    fn test_video_command_copies_audio_and_reports_progress() {
        let (cmd, _) = watermark_video_command("in.mp4", "wm", true, "out");
        let args = cmd.build_args();
        assert!(args.contains(&"-codec:a".to_string()));
        assert!(args.contains(&"copy".to_string()));
        assert!(args.contains(&"-progress".to_string()));
    }

    #[test]
    fn test_image_command_is_one_shot() {
        let (cmd, output) = watermark_image_command("uploads/pic.png", "wm", "out");
        let args = cmd.build_args();
        assert!(!args.contains(&"-progress".to_string()));
        assert!(!args.contains(&"-codec:a".to_string()));
        assert_eq!(output, PathBuf::from("out/watermarked_pic.png"));
    }
}
