use crate::{Error, PerspectiveError};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::reader::Reader;
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub const PERSPECTIVE_ELEMENT: &str = "perspective";

/// Arrangement of every dockable in one view, as captured by a docking
/// provider. Each provider has its own concrete type.
pub trait DockingLayout: Any + Send + fmt::Debug {
    /// Name of the provider that produced this layout.
    fn provider(&self) -> &str;

    /// Writes the complete `<perspective>` element.
    fn save_perspective(&self, out: &mut Writer<&mut dyn Write>) -> Result<(), Error>;

    /// Handler that fills this layout from a parsed perspective document.
    fn perspective_handler(&mut self) -> Box<dyn PerspectiveHandler + '_>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Receives the elements nested inside `<perspective>`, in document order.
pub trait PerspectiveHandler {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), PerspectiveError>;

    fn end_element(&mut self, _name: &str) -> Result<(), PerspectiveError> {
        Ok(())
    }
}

/// Unescaped attributes of one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    element: String,
    values: Vec<(String, String)>,
}

impl Attributes {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, Error> {
        let element = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut values = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            values.push((key, value));
        }

        Ok(Self { element, values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required(&self, key: &str) -> Result<&str, PerspectiveError> {
        self.get(key).ok_or_else(|| PerspectiveError::MissingAttribute {
            element: self.element.clone(),
            attribute: key.to_string(),
        })
    }

    /// Parses a required attribute.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, PerspectiveError> {
        let value = self.required(key)?;
        value.parse().map_err(|_| self.invalid(key, value))
    }

    /// Parses an attribute that may be absent.
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>, PerspectiveError> {
        self.get(key)
            .map(|value| value.parse().map_err(|_| self.invalid(key, value)))
            .transpose()
    }

    fn invalid(&self, key: &str, value: &str) -> PerspectiveError {
        PerspectiveError::InvalidAttribute {
            element: self.element.clone(),
            attribute: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Writes the XML prologue followed by the layout's `<perspective>` element.
pub fn write_perspective(layout: &dyn DockingLayout, out: &mut dyn Write) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    layout.save_perspective(&mut writer)?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Streams a whole document through `handler`.
///
/// The document must have exactly one `<perspective>` root. Only elements
/// below the root reach the handler.
pub fn read_perspective(input: &str, handler: &mut dyn PerspectiveHandler) -> Result<(), Error> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let attributes = Attributes::from_start(&start)?;
                enter(&mut open, &mut seen_root, &attributes, handler)?;
                open.push(attributes.element);
            }
            Event::Empty(start) => {
                let attributes = Attributes::from_start(&start)?;
                enter(&mut open, &mut seen_root, &attributes, handler)?;
                if !open.is_empty() {
                    handler.end_element(&attributes.element)?;
                }
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                open.pop();
                if !open.is_empty() {
                    handler.end_element(&name)?;
                }
            }
            Event::Text(text) if open.is_empty() && !text.is_empty() => {
                return Err(if seen_root {
                    PerspectiveError::TrailingContent
                } else {
                    PerspectiveError::MissingRoot
                }
                .into());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.pop() {
        return Err(PerspectiveError::Unterminated(element).into());
    }
    if !seen_root {
        return Err(PerspectiveError::MissingRoot.into());
    }

    Ok(())
}

fn enter(
    open: &mut [String],
    seen_root: &mut bool,
    attributes: &Attributes,
    handler: &mut dyn PerspectiveHandler,
) -> Result<(), Error> {
    if !open.is_empty() {
        handler.start_element(&attributes.element, attributes)?;
        return Ok(());
    }

    if *seen_root {
        return Err(PerspectiveError::TrailingContent.into());
    }
    if attributes.element != PERSPECTIVE_ELEMENT {
        return Err(PerspectiveError::UnexpectedRoot(attributes.element.clone()).into());
    }

    *seen_root = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl PerspectiveHandler for Recorder {
        fn start_element(
            &mut self,
            name: &str,
            attributes: &Attributes,
        ) -> Result<(), PerspectiveError> {
            let id = attributes.get("id").unwrap_or("-");
            self.events.push(format!("+{name}:{id}"));
            Ok(())
        }

        fn end_element(&mut self, name: &str) -> Result<(), PerspectiveError> {
            self.events.push(format!("-{name}"));
            Ok(())
        }
    }

    fn perspective_error(result: Result<(), Error>) -> PerspectiveError {
        match result {
            Err(Error::Perspective(err)) => err,
            other => panic!("expected a perspective error, got {other:?}"),
        }
    }

    #[test]
    fn children_of_root_reach_handler() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
            <perspective>
              <group id="a &amp; b"><item id="1"/></group>
              <item/>
            </perspective>"#;

        let mut recorder = Recorder::default();
        read_perspective(doc, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            ["+group:a & b", "+item:1", "-item", "-group", "+item:-", "-item"]
        );
    }

    #[test]
    fn root_must_be_perspective() {
        let mut recorder = Recorder::default();
        let err = perspective_error(read_perspective("<layout/>", &mut recorder));
        assert_eq!(err, PerspectiveError::UnexpectedRoot("layout".to_string()));
    }

    #[test]
    fn empty_document_has_no_root() {
        let mut recorder = Recorder::default();
        let err = perspective_error(read_perspective(
            r#"<?xml version="1.0"?>"#,
            &mut recorder,
        ));
        assert_eq!(err, PerspectiveError::MissingRoot);
    }

    #[test]
    fn second_root_is_rejected() {
        let mut recorder = Recorder::default();
        let err = perspective_error(read_perspective(
            "<perspective/><perspective/>",
            &mut recorder,
        ));
        assert_eq!(err, PerspectiveError::TrailingContent);
    }

    #[test]
    fn truncated_document_fails() {
        let mut recorder = Recorder::default();
        let result = read_perspective("<perspective><group id=\"x\">", &mut recorder);
        assert!(result.is_err());
    }

    #[test]
    fn attribute_parsing_reports_element() {
        let attributes = Attributes {
            element: "floating".to_string(),
            values: vec![("x".to_string(), "12".to_string()), ("y".to_string(), "up".to_string())],
        };

        assert_eq!(attributes.parse::<i32>("x"), Ok(12));
        assert_eq!(attributes.parse_opt::<i32>("width"), Ok(None));
        assert_eq!(
            attributes.parse::<i32>("y"),
            Err(PerspectiveError::InvalidAttribute {
                element: "floating".to_string(),
                attribute: "y".to_string(),
                value: "up".to_string(),
            })
        );
        assert_eq!(
            attributes.required("height"),
            Err(PerspectiveError::MissingAttribute {
                element: "floating".to_string(),
                attribute: "height".to_string(),
            })
        );
    }
}
