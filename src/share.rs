//! Flatten an outline into a plain-text message for sharing.
//!
//! The output carries no heading markers, so feeding it back through
//! [`crate::outline::parse`] does not rebuild the outline.

use std::fmt::Write;

use crate::outline::{OutlineContent, Section};

const BULLET: &str = "•";

pub fn share_text(heading: &str, sections: &[Section]) -> String {
    let mut out = String::new();
    if !heading.trim().is_empty() {
        let _ = writeln!(out, "{}", heading.trim());
        out.push('\n');
    }

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", section.title);
        match &section.content {
            OutlineContent::Lines(lines) => {
                for line in lines {
                    let _ = writeln!(out, "  {BULLET} {line}");
                }
            }
            OutlineContent::Workout(days) => {
                for (label, plan) in days.iter() {
                    let _ = writeln!(out, "  {label}");
                    for line in &plan.content {
                        let _ = writeln!(out, "    {BULLET} {line}");
                    }
                    for sub in &plan.sections {
                        let _ = writeln!(out, "    {}", sub.title);
                        for line in &sub.content {
                            let _ = writeln!(out, "      {BULLET} {line}");
                        }
                    }
                }
            }
        }
    }

    out.trim_end().to_string()
}
