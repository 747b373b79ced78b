//! The drawable parts of the instrument.
//!
//! Every part satisfies one capability: draw itself onto a page, or
//! equivalently render itself straight to a file in a chosen format. The
//! composite satisfies the same contract by painting its children onto a
//! single page in list order, so later children overlay earlier ones.
//!
//! Bodies here lay out the structural geometry of each part (rims, grids,
//! labels); the stereographic projection of scales and stars is the
//! projection layer's concern and stays out of these display lists.

use std::path::{Path, PathBuf};

use crate::graphics::{GraphicsPage, ImageFormat, RenderError, PAGE_WIDTH};
use crate::settings::Settings;
use crate::text::TextBundle;

// All parts are laid out around a common page centre.
const CENTRE_X: f64 = PAGE_WIDTH / 2.0;
const CENTRE_Y: f64 = 140.0;

// Outer radius of the mother plate in mm; the other parts derive from it.
const MOTHER_RADIUS: f64 = 90.0;

const LINE_WIDTH: f64 = 0.3;
const LABEL_SIZE: f64 = 5.0;

/// A drawable part of the astrolabe.
pub trait Component {
    fn settings(&self) -> &Settings;

    /// Append this part's geometry to `page`.
    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError>;

    /// Draw onto a fresh page and write it as `{stem}.{ext}`. Returns the
    /// path actually written.
    fn render_to_file(&self, stem: &Path, format: ImageFormat) -> Result<PathBuf, RenderError> {
        let mut page = GraphicsPage::new(self.settings().theme);
        self.draw(&mut page)?;
        page.write_to_file(stem, format)
    }
}

fn label(page: &mut GraphicsPage, text: &str) {
    page.draw_text(CENTRE_X, 20.0, LABEL_SIZE, text, page.palette().ink);
}

/// Front of the fixed base plate: the rim that holds the climate and rete.
pub struct MotherFront {
    settings: Settings,
    name: String,
}

impl MotherFront {
    pub fn new(settings: &Settings, texts: &TextBundle) -> Self {
        Self {
            settings: settings.clone(),
            name: texts.mother_front.clone(),
        }
    }
}

impl Component for MotherFront {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError> {
        let ink = page.palette().ink;
        label(page, &self.name);
        // Outer rim and the recess the climate sits in.
        page.draw_circle(CENTRE_X, CENTRE_Y, MOTHER_RADIUS, LINE_WIDTH * 2.0, ink);
        page.draw_circle(CENTRE_X, CENTRE_Y, MOTHER_RADIUS - 10.0, LINE_WIDTH, ink);
        // Central pivot hole.
        page.draw_circle(CENTRE_X, CENTRE_Y, 1.5, LINE_WIDTH, ink);
        Ok(())
    }
}

/// Back of the fixed base plate, carrying the sighting scales.
pub struct MotherBack {
    settings: Settings,
    name: String,
}

impl MotherBack {
    pub fn new(settings: &Settings, texts: &TextBundle) -> Self {
        Self {
            settings: settings.clone(),
            name: texts.mother_back.clone(),
        }
    }
}

impl Component for MotherBack {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError> {
        let ink = page.palette().ink;
        label(page, &self.name);
        page.draw_circle(CENTRE_X, CENTRE_Y, MOTHER_RADIUS, LINE_WIDTH * 2.0, ink);
        // Rings that carry the degree and calendar scales.
        for inset in [6.0, 12.0, 22.0] {
            page.draw_circle(CENTRE_X, CENTRE_Y, MOTHER_RADIUS - inset, LINE_WIDTH, ink);
        }
        // Horizontal and vertical diameters the scales are read against.
        page.draw_line(
            CENTRE_X - MOTHER_RADIUS,
            CENTRE_Y,
            CENTRE_X + MOTHER_RADIUS,
            CENTRE_Y,
            LINE_WIDTH,
            ink,
        );
        page.draw_line(
            CENTRE_X,
            CENTRE_Y - MOTHER_RADIUS,
            CENTRE_X,
            CENTRE_Y + MOTHER_RADIUS,
            LINE_WIDTH,
            ink,
        );
        page.draw_circle(CENTRE_X, CENTRE_Y, 1.5, LINE_WIDTH, ink);
        Ok(())
    }
}

/// The rotating star map. Its ecliptic ring sits offset towards the
/// solstice that faces the observer's hemisphere.
pub struct Rete {
    settings: Settings,
    name: String,
}

impl Rete {
    pub fn new(settings: &Settings, texts: &TextBundle) -> Self {
        Self {
            settings: settings.clone(),
            name: texts.rete.clone(),
        }
    }
}

impl Component for Rete {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError> {
        let ink = page.palette().ink;
        let accent = page.palette().accent;
        label(page, &self.name);
        let radius = MOTHER_RADIUS - 10.0;
        page.draw_circle(CENTRE_X, CENTRE_Y, radius, LINE_WIDTH * 2.0, ink);
        let offset = if self.settings.southern() { -1.0 } else { 1.0 };
        page.draw_circle(
            CENTRE_X,
            CENTRE_Y + offset * radius * 0.2,
            radius * 0.65,
            LINE_WIDTH,
            accent,
        );
        page.draw_circle(CENTRE_X, CENTRE_Y, 1.5, LINE_WIDTH, ink);
        Ok(())
    }
}

/// The sighting arm pivoting over the rete.
pub struct Rule {
    settings: Settings,
    name: String,
}

impl Rule {
    pub fn new(settings: &Settings, texts: &TextBundle) -> Self {
        Self {
            settings: settings.clone(),
            name: texts.rule.clone(),
        }
    }
}

impl Component for Rule {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError> {
        let ink = page.palette().ink;
        label(page, &self.name);
        let half_width = 5.0;
        let length = MOTHER_RADIUS - 5.0;
        // A narrow bar through the pivot, pointed at both ends.
        page.draw_line(
            CENTRE_X - half_width,
            CENTRE_Y - length,
            CENTRE_X - half_width,
            CENTRE_Y + length,
            LINE_WIDTH,
            ink,
        );
        page.draw_line(
            CENTRE_X + half_width,
            CENTRE_Y - length,
            CENTRE_X + half_width,
            CENTRE_Y + length,
            LINE_WIDTH,
            ink,
        );
        page.draw_line(
            CENTRE_X - half_width,
            CENTRE_Y - length,
            CENTRE_X,
            CENTRE_Y - length - half_width,
            LINE_WIDTH,
            ink,
        );
        page.draw_line(
            CENTRE_X + half_width,
            CENTRE_Y - length,
            CENTRE_X,
            CENTRE_Y - length - half_width,
            LINE_WIDTH,
            ink,
        );
        page.draw_line(
            CENTRE_X - half_width,
            CENTRE_Y + length,
            CENTRE_X,
            CENTRE_Y + length + half_width,
            LINE_WIDTH,
            ink,
        );
        page.draw_line(
            CENTRE_X + half_width,
            CENTRE_Y + length,
            CENTRE_X,
            CENTRE_Y + length + half_width,
            LINE_WIDTH,
            ink,
        );
        page.draw_circle(CENTRE_X, CENTRE_Y, 1.5, LINE_WIDTH, ink);
        Ok(())
    }
}

/// The latitude-specific altitude grid glued onto the mother front.
pub struct Climate {
    settings: Settings,
    name: String,
}

impl Climate {
    pub fn new(settings: &Settings, texts: &TextBundle) -> Self {
        Self {
            settings: settings.clone(),
            name: texts.climate.clone(),
        }
    }
}

impl Component for Climate {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError> {
        let accent = page.palette().accent;
        label(page, &self.name);
        let radius = MOTHER_RADIUS - 10.0;
        page.draw_circle(CENTRE_X, CENTRE_Y, radius, LINE_WIDTH * 2.0, accent);
        // Almucantar rings; their spacing tightens towards the zenith with
        // the observer's latitude.
        let squeeze = 1.0 - self.settings.latitude.abs() / 180.0;
        for i in 1..=4 {
            let r = radius * squeeze * f64::from(i) / 5.0;
            page.draw_circle(CENTRE_X, CENTRE_Y, r, LINE_WIDTH, accent);
        }
        page.draw_circle(CENTRE_X, CENTRE_Y, 1.5, LINE_WIDTH, accent);
        Ok(())
    }
}

/// A part assembled from other parts, painted in list order onto one page.
pub struct CompositeComponent {
    settings: Settings,
    components: Vec<Box<dyn Component>>,
}

impl CompositeComponent {
    pub fn new(settings: &Settings, components: Vec<Box<dyn Component>>) -> Self {
        Self {
            settings: settings.clone(),
            components,
        }
    }
}

impl Component for CompositeComponent {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn draw(&self, page: &mut GraphicsPage) -> Result<(), RenderError> {
        for component in &self.components {
            component.draw(page)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AstrolabeType, Theme};
    use crate::text::TextRegistry;

    fn settings() -> Settings {
        Settings {
            language: "en".to_string(),
            astrolabe_type: AstrolabeType::Full,
            latitude: 52.0,
            theme: Theme::Default,
        }
    }

    #[test]
    fn composite_layers_children_in_list_order() {
        let registry = TextRegistry::builtin().unwrap();
        let texts = registry.get("en").unwrap();
        let settings = settings();

        let mother = MotherFront::new(&settings, texts);
        let climate = Climate::new(&settings, texts);

        let mut mother_page = GraphicsPage::new(settings.theme);
        mother.draw(&mut mother_page).unwrap();
        let mother_count = mother_page.elements().len();

        let composite = CompositeComponent::new(
            &settings,
            vec![
                Box::new(MotherFront::new(&settings, texts)),
                Box::new(Climate::new(&settings, texts)),
            ],
        );
        let mut page = GraphicsPage::new(settings.theme);
        composite.draw(&mut page).unwrap();

        // The leading elements are exactly the mother front's; everything
        // after them belongs to the climate, i.e. draws on top.
        assert_eq!(&page.elements()[..mother_count], mother_page.elements());

        let mut climate_page = GraphicsPage::new(settings.theme);
        climate.draw(&mut climate_page).unwrap();
        assert_eq!(&page.elements()[mother_count..], climate_page.elements());
    }

    #[test]
    fn rete_offset_follows_hemisphere() {
        let registry = TextRegistry::builtin().unwrap();
        let texts = registry.get("en").unwrap();
        let mut southern = settings();
        southern.latitude = -33.0;

        let mut north_page = GraphicsPage::new(Theme::Default);
        Rete::new(&settings(), texts).draw(&mut north_page).unwrap();
        let mut south_page = GraphicsPage::new(Theme::Default);
        Rete::new(&southern, texts).draw(&mut south_page).unwrap();

        assert_ne!(north_page.elements(), south_page.elements());
    }
}
