use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Perspective(#[from] PerspectiveError),
    #[error("dockable `{0}` is already registered")]
    DuplicateDockable(String),
    #[error("no docking provider named `{0}`")]
    UnknownProvider(String),
    #[error("background perspective load stopped before finishing")]
    LoadInterrupted,
}

/// Problems with the structure of a perspective document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PerspectiveError {
    #[error("document has no <perspective> root element")]
    MissingRoot,
    #[error("expected <perspective> root, found <{0}>")]
    UnexpectedRoot(String),
    #[error("content after the </perspective> end tag")]
    TrailingContent,
    #[error("document ends inside <{0}>")]
    Unterminated(String),
    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),
    #[error("<{element}> is missing attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: String,
    },
    #[error("<{element}> has invalid {attribute}=\"{value}\"")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
}
