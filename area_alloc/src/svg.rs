// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dump the allocator layout as an SVG image, for debugging packing behavior.

use std::io::{self, Write};

use crate::allocator::AreaAllocator;
use crate::rect::Rect;

const FREE_FILL: &str = "rgb(70,70,180)";
const ALLOCATED_FILL: &str = "rgb(150,200,150)";
const STROKE: &str = "black";

impl AreaAllocator {
    /// Write an SVG picture of the free and allocated areas to `output`.
    ///
    /// One SVG unit corresponds to one cell.
    pub fn dump_svg(&self, output: &mut dyn Write) -> io::Result<()> {
        let bounds = self.bounds();
        writeln!(
            output,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = bounds.width,
            h = bounds.height,
        )?;

        for rect in self.free_areas() {
            write_rect(output, rect, FREE_FILL)?;
        }
        for area in self.allocated_areas() {
            write_rect(output, area.rect(), ALLOCATED_FILL)?;
        }

        writeln!(output, "</svg>")
    }
}

fn write_rect(output: &mut dyn Write, rect: Rect, fill: &str) -> io::Result<()> {
    writeln!(
        output,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" style="fill:{fill};stroke:{STROKE};stroke-width:1"/>"#,
        rect.x, rect.y, rect.width, rect.height,
    )
}
