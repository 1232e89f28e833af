//! A minimal server handle: just enough topology knowledge for command
//! building, namely the negotiated wire version.

/// Server releases paired with the wire version they introduced.
const VERSION_TABLE: &[(&str, u8)] = &[
    ("2.6", 2),
    ("3.0", 3),
    ("3.2", 4),
    ("3.4", 5),
    ("3.6", 6),
    ("4.0", 7),
    ("4.2", 8),
];

/// Map a server release string to its wire version.
pub fn wire_version_of(server_version: &str) -> Option<u8> {
    VERSION_TABLE
        .iter()
        .find(|(release, _)| *release == server_version)
        .map(|(_, wire)| *wire)
}

/// Map a wire version back to the server release that introduced it.
pub fn server_version_of(wire_version: u8) -> Option<&'static str> {
    VERSION_TABLE
        .iter()
        .find(|(_, wire)| *wire == wire_version)
        .map(|(release, _)| *release)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Server {
    wire_version: u8,
}

impl Server {
    pub fn new(wire_version: u8) -> Self {
        Server { wire_version }
    }

    pub fn wire_version(&self) -> u8 {
        self.wire_version
    }

    pub fn server_version(&self) -> Option<&'static str> {
        server_version_of(self.wire_version)
    }

    /// Whether this server speaks a strictly newer wire protocol than the
    /// given release.
    pub fn above(&self, server_version: &str) -> bool {
        wire_version_of(server_version).is_some_and(|wire| self.wire_version > wire)
    }

    pub fn at_least(&self, server_version: &str) -> bool {
        wire_version_of(server_version).is_some_and(|wire| self.wire_version >= wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_table_round_trips() {
        for (release, wire) in VERSION_TABLE {
            assert_eq!(wire_version_of(release), Some(*wire));
            assert_eq!(server_version_of(*wire), Some(*release));
        }
    }

    #[test]
    fn unknown_versions_are_none() {
        assert_eq!(wire_version_of("1.8"), None);
        assert_eq!(server_version_of(99), None);
    }

    #[test]
    fn comparisons() {
        let server = Server::new(8);
        assert_eq!(server.server_version(), Some("4.2"));
        assert!(server.above("4.0"));
        assert!(!server.above("4.2"));
        assert!(server.at_least("4.2"));
    }
}
