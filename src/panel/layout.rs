use super::PROVIDER_NAME;
use crate::layout::{Attributes, DockingLayout, PERSPECTIVE_ELEMENT, PerspectiveHandler};
use crate::{Error, PerspectiveError};

use data::config::Dimension;
use data::{DockPosition, Region, WindowSpec};
use enum_map::EnumMap;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::any::Any;
use std::collections::BTreeMap;
use std::io::Write;

const DOCKING: &str = "docking";
const REGION: &str = "region";
const DOCKABLE: &str = "dockable";
const FLOATING: &str = "floating";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionLayout {
    pub dimension: Dimension,
    pub current: Option<String>,
}

/// Arrangement captured by the panel manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelLayout {
    pub alternate_layout: bool,
    pub regions: EnumMap<Region, RegionLayout>,
    pub positions: BTreeMap<String, DockPosition>,
    /// Geometry of the floating windows that were open.
    pub floating: BTreeMap<String, WindowSpec>,
}

impl DockingLayout for PanelLayout {
    fn provider(&self) -> &str {
        PROVIDER_NAME
    }

    fn save_perspective(&self, out: &mut Writer<&mut dyn Write>) -> Result<(), Error> {
        out.write_event(Event::Start(BytesStart::new(PERSPECTIVE_ELEMENT)))?;

        let mut docking = BytesStart::new(DOCKING);
        docking.push_attribute(("alternate-layout", bool_str(self.alternate_layout)));
        out.write_event(Event::Empty(docking))?;

        for (region, state) in &self.regions {
            let dimension = u32::from(state.dimension).to_string();
            let mut element = BytesStart::new(REGION);
            element.push_attribute(("position", region.as_str()));
            element.push_attribute(("dimension", dimension.as_str()));
            if let Some(current) = &state.current {
                element.push_attribute(("current", current.as_str()));
            }
            out.write_event(Event::Empty(element))?;
        }

        for (name, position) in &self.positions {
            let mut element = BytesStart::new(DOCKABLE);
            element.push_attribute(("name", name.as_str()));
            element.push_attribute(("position", position.as_str()));
            out.write_event(Event::Empty(element))?;
        }

        for (name, spec) in &self.floating {
            let (x, y, width, height) = (
                spec.pos_x.to_string(),
                spec.pos_y.to_string(),
                spec.width.to_string(),
                spec.height.to_string(),
            );
            let mut element = BytesStart::new(FLOATING);
            element.push_attribute(("name", name.as_str()));
            element.push_attribute(("x", x.as_str()));
            element.push_attribute(("y", y.as_str()));
            element.push_attribute(("width", width.as_str()));
            element.push_attribute(("height", height.as_str()));
            out.write_event(Event::Empty(element))?;
        }

        out.write_event(Event::End(BytesEnd::new(PERSPECTIVE_ELEMENT)))?;
        Ok(())
    }

    fn perspective_handler(&mut self) -> Box<dyn PerspectiveHandler + '_> {
        Box::new(Handler { layout: self })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

struct Handler<'a> {
    layout: &'a mut PanelLayout,
}

impl PerspectiveHandler for Handler<'_> {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), PerspectiveError> {
        match name {
            DOCKING => {
                self.layout.alternate_layout =
                    attributes.parse_opt("alternate-layout")?.unwrap_or(false);
            }
            REGION => {
                let region: Region = attributes.parse("position")?;
                let dimension: u32 = attributes.parse("dimension")?;
                self.layout.regions[region] = RegionLayout {
                    dimension: dimension.into(),
                    current: attributes.get("current").map(str::to_string),
                };
            }
            DOCKABLE => {
                let position = attributes.parse("position")?;
                self.layout
                    .positions
                    .insert(attributes.required("name")?.to_string(), position);
            }
            FLOATING => {
                let spec = WindowSpec {
                    pos_x: attributes.parse("x")?,
                    pos_y: attributes.parse("y")?,
                    width: attributes.parse("width")?,
                    height: attributes.parse("height")?,
                };
                self.layout
                    .floating
                    .insert(attributes.required("name")?.to_string(), spec);
            }
            other => return Err(PerspectiveError::UnexpectedElement(other.to_string())),
        }
        Ok(())
    }
}
