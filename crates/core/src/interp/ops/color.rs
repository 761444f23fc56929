//! Color operators.
//!
//! Handles: CS, cs, SC, SCN, sc, scn, G, g, RG, rg, K, k
//!
//! Device color operators (G/g, RG/rg, K/k) also select the matching
//! device color space.

use crate::error::Result;
use crate::interp::replay::ContentReplay;
use crate::model::color::PDFColorSpace;
use crate::model::state::Color;

/// Which of the two current colors an operator targets.
#[derive(Clone, Copy)]
enum Target {
    Stroke,
    Fill,
}

#[allow(non_snake_case)]
impl ContentReplay {
    /// Look up a color space by operand name: a device family or a
    /// `/ColorSpace` resource.
    fn color_space_named(&self, operator: &str, name: &str) -> Result<Option<PDFColorSpace>> {
        if let Some(space) = PDFColorSpace::predefined(name) {
            return Ok(Some(space));
        }
        let found = match self.resources().named_color_space(name) {
            Ok(Some(obj)) => PDFColorSpace::from_object(&obj, self.scanner.as_ref()),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        match found {
            Ok(Some(space)) => Ok(Some(space)),
            Ok(None) => {
                self.recover(operator, format!("unknown color space /{name}"))?;
                Ok(None)
            }
            Err(e) => {
                self.recover(operator, format!("color space /{name}: {e}"))?;
                Ok(None)
            }
        }
    }

    fn set_color_space(&mut self, target: Target, space: PDFColorSpace, name: Option<&str>) {
        let color = Color::initial_for(&space);
        let name = name.map(str::to_owned);
        match target {
            Target::Stroke => {
                self.state.scs = space;
                self.state.scs_name = name;
                self.state.scolor = color;
            }
            Target::Fill => {
                self.state.ncs = space;
                self.state.ncs_name = name;
                self.state.ncolor = color;
            }
        }
    }

    fn set_color(&mut self, target: Target, color: Color) {
        match target {
            Target::Stroke => self.state.scolor = color,
            Target::Fill => self.state.ncolor = color,
        }
    }

    fn pattern_color(components: &[f64], pattern: Option<&str>) -> Color {
        match pattern {
            Some(name) if components.is_empty() => Color::PatternColored(name.to_string()),
            Some(name) => Color::PatternUncolored(
                Box::new(Color::from_components(components)),
                name.to_string(),
            ),
            None => Color::from_components(components),
        }
    }

    /// PDF operator: `CS`
    pub(crate) fn do_CS(&mut self, name: &str) -> Result<()> {
        if let Some(space) = self.color_space_named("CS", name)? {
            self.set_color_space(Target::Stroke, space, Some(name));
        }
        Ok(())
    }

    /// PDF operator: `cs`
    pub(crate) fn do_cs(&mut self, name: &str) -> Result<()> {
        if let Some(space) = self.color_space_named("cs", name)? {
            self.set_color_space(Target::Fill, space, Some(name));
        }
        Ok(())
    }

    /// PDF operator: `SC`
    pub(crate) fn do_SC(&mut self, components: &[f64]) {
        self.set_color(Target::Stroke, Color::from_components(components));
    }

    /// PDF operator: `sc`
    pub(crate) fn do_sc(&mut self, components: &[f64]) {
        self.set_color(Target::Fill, Color::from_components(components));
    }

    /// Like `SC`, with an optional trailing pattern name.
    ///
    /// PDF operator: `SCN`
    pub(crate) fn do_SCN(&mut self, components: &[f64], pattern: Option<&str>) {
        self.set_color(Target::Stroke, Self::pattern_color(components, pattern));
    }

    /// PDF operator: `scn`
    pub(crate) fn do_scn(&mut self, components: &[f64], pattern: Option<&str>) {
        self.set_color(Target::Fill, Self::pattern_color(components, pattern));
    }

    /// PDF operator: `G`
    pub(crate) fn do_G(&mut self, gray: f64) {
        self.set_color_space(Target::Stroke, PDFColorSpace::device_gray(), None);
        self.set_color(Target::Stroke, Color::Gray(gray));
    }

    /// PDF operator: `g`
    pub(crate) fn do_g(&mut self, gray: f64) {
        self.set_color_space(Target::Fill, PDFColorSpace::device_gray(), None);
        self.set_color(Target::Fill, Color::Gray(gray));
    }

    /// PDF operator: `RG`
    pub(crate) fn do_RG(&mut self, r: f64, g: f64, b: f64) {
        self.set_color_space(Target::Stroke, PDFColorSpace::new("DeviceRGB", 3), None);
        self.set_color(Target::Stroke, Color::Rgb(r, g, b));
    }

    /// PDF operator: `rg`
    pub(crate) fn do_rg(&mut self, r: f64, g: f64, b: f64) {
        self.set_color_space(Target::Fill, PDFColorSpace::new("DeviceRGB", 3), None);
        self.set_color(Target::Fill, Color::Rgb(r, g, b));
    }

    /// PDF operator: `K`
    pub(crate) fn do_K(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.set_color_space(Target::Stroke, PDFColorSpace::new("DeviceCMYK", 4), None);
        self.set_color(Target::Stroke, Color::Cmyk(c, m, y, k));
    }

    /// PDF operator: `k`
    pub(crate) fn do_k(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.set_color_space(Target::Fill, PDFColorSpace::new("DeviceCMYK", 4), None);
        self.set_color(Target::Fill, Color::Cmyk(c, m, y, k));
    }
}
