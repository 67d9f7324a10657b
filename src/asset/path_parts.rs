use std::fmt;
use crate::LoadError;

/**
 * Deconstructed path to a file.
 */
#[derive(Clone, Eq, PartialEq, Default, Debug, Hash)]
pub struct AssetPath {
    pub protocol: String,
    pub prefix: Option<String>,
    pub body: String,
    pub extension: String,
}

impl AssetPath {

    pub fn parse(path: &str, default_protocol: Option<&str>) -> Result<Self, LoadError> {
        let protocol: Option<&str>;
        let mut remainder = path;

        // Reads protocol
        match remainder.split_once("://") {
            Some((left, right)) => {
                protocol = Some(left);
                remainder = right;
            },
            None => protocol = None,
        };
        let Some(protocol) = protocol.or(default_protocol) else {
            return Err(LoadError::NoDefaultProtocol)
        };

        // Reads body and extension from the last path segment only, so "../tiles.tsx" stays intact.
        let file_start = remainder.rfind('/').map(|idx| idx + 1).unwrap_or(0);
        let (body, extension) = match remainder[file_start..].rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
                (&remainder[..file_start + stem.len()], extension)
            },
            _ => return Err(LoadError::PathMissingExtension { path: String::from(path) }),
        };

        Ok(Self {
            protocol: protocol.into(),
            prefix: None,
            body: body.into(),
            extension: extension.into()
        })
    }

    /// Body and extension. No protocol.
    pub fn without_protocol(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) => format!("{}/{}.{}", prefix, self.body, self.extension),
            None => format!("{}.{}", self.body, self.extension),
        }
    }

    /// Parent directory of this file, relative to the prefix.
    /// None if it's at the root.
    pub fn parent(&self) -> Option<String> {
        let (parent, _) = self.body.rsplit_once('/')?;
        Some(String::from(parent))
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix.as_deref() {
            Some(prefix) => write!(f, "{}://{}/{}.{}", self.protocol, prefix, self.body, self.extension),
            None => write!(f, "{}://{}.{}", self.protocol, self.body, self.extension),
        }
    }
}

/**
 * Wrapper for the hash of a path.
 */
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct PathHash(pub u64);
impl PathHash {
    pub fn of(path: &str) -> Self {
        Self(fxhash::hash64(path))
    }
}

#[cfg(test)]
mod test {
    use crate::{AssetPath, LoadError};

    #[test]
    fn parse_with_default_protocol() {
        let path = AssetPath::parse("maps/castle1.tmx", Some("file")).unwrap();
        assert_eq!("file", path.protocol);
        assert_eq!("maps/castle1", path.body);
        assert_eq!("tmx", path.extension);
        assert_eq!(Some(String::from("maps")), path.parent());
        assert_eq!("maps/castle1.tmx", path.without_protocol());
    }

    #[test]
    fn parse_explicit_protocol() {
        let path = AssetPath::parse("raw://anthea_tileset.tsx", Some("file")).unwrap();
        assert_eq!("raw", path.protocol);
        assert_eq!(None, path.parent());
        assert_eq!("raw://anthea_tileset.tsx", path.to_string());
    }

    #[test]
    fn parse_dotted_directories() {
        let path = AssetPath::parse("maps/../tiles/v1.2/anthea.tsx", Some("file")).unwrap();
        assert_eq!("maps/../tiles/v1.2/anthea", path.body);
        assert_eq!("tsx", path.extension);
        assert_eq!(Some(String::from("maps/../tiles/v1.2")), path.parent());
    }

    #[test]
    fn prefix() {
        let mut path = AssetPath::parse("anthea_tileset.tsx", Some("file")).unwrap();
        path.prefix = Some(String::from("assets"));
        assert_eq!("assets/anthea_tileset.tsx", path.without_protocol());
        assert_eq!("file://assets/anthea_tileset.tsx", path.to_string());
    }

    #[test]
    fn missing_parts() {
        assert!(matches!(
            AssetPath::parse("anthea_tileset.tsx", None),
            Err(LoadError::NoDefaultProtocol)
        ));
        assert!(matches!(
            AssetPath::parse("tiles.d/anthea", Some("file")),
            Err(LoadError::PathMissingExtension { .. })
        ));
    }
}
