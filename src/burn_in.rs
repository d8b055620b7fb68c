/*!
 * Style directive handed to the transcoding tool when burning captions into video.
 *
 * The directive is rendered in the `force_style` syntax understood by ffmpeg's
 * subtitles filter. The vertical margin comes from a caption's normalized position:
 * `y = 100` sits on the bottom edge, `y = 0` on the top edge.
 */

use std::fmt;

use crate::app_config::BurnInConfig;
use crate::subtitle_processor::{Position, Timeline};

/// Font and placement for burned-in captions
#[derive(Debug, Clone, PartialEq)]
pub struct BurnInStyle {
    pub font_name: String,
    pub font_size: u32,
    /// Distance from the bottom edge in pixels
    pub margin_v: u32,
}

impl BurnInStyle {
    /// Derive a style from a caption position and the output video height
    pub fn from_position(position: Option<Position>, video_height: u32, config: &BurnInConfig) -> Self {
        let margin_v = match position {
            Some(pos) => {
                let from_bottom = (100.0 - pos.y).clamp(0.0, 100.0) / 100.0;
                (from_bottom * video_height as f64).round() as u32
            }
            None => config.default_margin_v,
        };

        Self {
            font_name: config.font_name.clone(),
            font_size: config.font_size,
            margin_v,
        }
    }

    /// Style for a whole timeline: the first positioned entry decides the margin
    pub fn for_timeline(timeline: &Timeline, video_height: u32, config: &BurnInConfig) -> Self {
        let position = timeline.iter().find_map(|e| e.position);
        Self::from_position(position, video_height, config)
    }

    /// Render as a `force_style` argument
    pub fn to_force_style(&self) -> String {
        // Commas separate keys, so they cannot appear inside the font name
        let font_name = self.font_name.replace(',', " ");
        format!(
            "FontName={},FontSize={},MarginV={}",
            font_name, self.font_size, self.margin_v
        )
    }
}

impl fmt::Display for BurnInStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_force_style())
    }
}
