//! Backend selection for an inbound request path.
//!
//! [`dispatch`] decides whether the broker handles a path at all (only
//! paths whose last segment carries a file extension), picks the next
//! backend round-robin, and checks the path's mount segment against the
//! backend's mount path.

use crate::directory::{BackendDescriptor, Directory};

/// Body written when the directory is empty.
pub const NO_BACKEND_BODY: &str = "<b>NO BACKEND AVAILABLE</b>";

/// Body written when the selected backend does not serve the mount.
pub const SERVER_NOT_FOUND_BODY: &str = "<b>SERVER NOT FOUND</b>";

/// How the backend body is copied back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `/file.ext`: decoded as text, newline-terminated.
    Html,
    /// `/mount/file.ext`: copied as opaque bytes.
    Media,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No file extension; another handler should answer.
    NotHandled,
    NoBackend,
    MountMismatch {
        backend: BackendDescriptor,
        requested: String,
    },
    Forward {
        backend: BackendDescriptor,
        classification: Classification,
    },
}

/// Extension of the last path segment, if it has a non-empty one.
#[must_use]
pub fn extension(path: &str) -> Option<&str> {
    let last = path.split('/').rfind(|s| !s.is_empty())?;
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

#[must_use]
pub fn dispatch(directory: &Directory, path: &str) -> Dispatch {
    if extension(path).is_none() {
        return Dispatch::NotHandled;
    }

    let Some(backend) = directory.select_next() else {
        return Dispatch::NoBackend;
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() == 1 {
        return Dispatch::Forward {
            backend,
            classification: Classification::Html,
        };
    }

    let requested = segments[0];
    if requested != backend.mount_segment() {
        return Dispatch::MountMismatch {
            requested: requested.to_string(),
            backend,
        };
    }

    Dispatch::Forward {
        backend,
        classification: Classification::Media,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_with(mounts: &[&str]) -> Directory {
        let dir = Directory::new();
        for (i, mount) in mounts.iter().enumerate() {
            dir.register(BackendDescriptor::new(
                "127.0.0.1",
                8081 + i as u16,
                i as u32,
                *mount,
            ));
        }
        dir
    }

    #[test]
    fn extension_of_last_segment() {
        assert_eq!(extension("/index.html"), Some("html"));
        assert_eq!(extension("/default/clip.tar.mp4"), Some("mp4"));
        assert_eq!(extension("/v1.2/readme"), None);
        assert_eq!(extension("/health"), None);
        assert_eq!(extension("/trailing."), None);
        assert_eq!(extension("/"), None);
        assert_eq!(extension(""), None);
    }

    #[test]
    fn path_without_extension_is_not_handled() {
        let dir = directory_with(&["/default"]);
        assert_eq!(dispatch(&dir, "/default/page"), Dispatch::NotHandled);
        // The cursor did not move.
        assert_eq!(dir.snapshot().cursor, 0);
    }

    #[test]
    fn empty_directory_reports_no_backend() {
        let dir = Directory::new();
        assert_eq!(dispatch(&dir, "/index.html"), Dispatch::NoBackend);
        assert_eq!(dispatch(&dir, "/default/a.png"), Dispatch::NoBackend);
    }

    #[test]
    fn single_segment_is_html() {
        let dir = directory_with(&["/default"]);
        assert!(matches!(
            dispatch(&dir, "/index.html"),
            Dispatch::Forward {
                classification: Classification::Html,
                ..
            }
        ));
    }

    #[test]
    fn matching_mount_is_media() {
        let dir = directory_with(&["/default"]);
        match dispatch(&dir, "/default/cat.png") {
            Dispatch::Forward {
                backend,
                classification,
            } => {
                assert_eq!(backend.mount_path, "/default");
                assert_eq!(classification, Classification::Media);
            }
            other => panic!("unexpected dispatch: {other:?}"),
        }
    }

    #[test]
    fn mount_mismatch_still_advances_cursor() {
        let dir = directory_with(&["/a", "/b"]);
        assert!(matches!(
            dispatch(&dir, "/b/x.jpg"),
            Dispatch::MountMismatch { ref requested, .. } if requested == "b"
        ));
        assert!(matches!(
            dispatch(&dir, "/b/x.jpg"),
            Dispatch::Forward { ref backend, .. } if backend.mount_path == "/b"
        ));
    }

    #[test]
    fn nested_mount_matches_its_first_component() {
        let dir = directory_with(&["/media/videos"]);
        assert!(matches!(
            dispatch(&dir, "/media/videos/clip.mp4"),
            Dispatch::Forward {
                classification: Classification::Media,
                ..
            }
        ));
        assert!(matches!(
            dispatch(&dir, "/media/clip.mp4"),
            Dispatch::Forward { .. }
        ));
        assert!(matches!(
            dispatch(&dir, "/videos/clip.mp4"),
            Dispatch::MountMismatch { ref requested, .. } if requested == "videos"
        ));
    }
}
