//! Terminal presentation: a text-dump render backend and an OSC title sink.

use std::cmp::Ordering;
use std::io::Write;

use reprise_core::prelude::*;

/// Prints each committed frame's text content to stdout, top to bottom,
/// left to right. Rects and borders are dropped; this backend exists so a
/// demo run in a terminal shows what the composition said, not how it was
/// boxed. Write errors are ignored — a closed pipe should not kill the host.
#[derive(Default)]
pub struct TermBackend {
    size: (u32, u32),
}

impl RenderBackend for TermBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn commit(&mut self, scene: &Scene) {
        let mut texts: Vec<(f32, f32, &str)> = scene
            .nodes
            .iter()
            .filter_map(|n| match n {
                SceneNode::Text { rect, text, .. } => Some((rect.y, rect.x, text.as_str())),
                _ => None,
            })
            .collect();
        texts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "-- frame --");
        for (_, _, text) in texts {
            let _ = writeln!(out, "{text}");
        }
        let _ = out.flush();
    }
}

/// Sets the terminal title through the OSC 0 escape sequence.
pub struct OscTitle;

impl TitleSink for OscTitle {
    fn set_title(&self, title: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let _ = write!(out, "\x1b]0;{title}\x07");
        let _ = out.flush();
    }
}
