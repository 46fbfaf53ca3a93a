//! The filesystem view of decoded resources, driven through the path-based
//! call surface.

use rsrc_format::translate::{TranslatorFilter, Translators};
use rsrc_format::{Resource, ResourceMap, TypeCode};
use rsrcfuse::{AccessMode, DirEntry, DirectorySink, FsError, NodeKind, Vfs};

/// One `TEXT` resource, id 128, named "Hello", holding `hi`.
#[rustfmt::skip]
const HELLO_FORK: [u8; 92] = [
    // Header: data at 0x1e, map at 0x24, data length, map length
    0x00, 0x00, 0x00, 0x1e, 0x00, 0x00, 0x00, 0x24,
    0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x38,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // Data
    0x00, 0x00, 0x00, 0x02, b'h', b'i',
    // Map: reserved, type list offset, name list offset
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0x00, 0x1c, 0x00, 0x32,
    // Type list
    0x00, 0x00, b'T', b'E', b'X', b'T', 0x00, 0x00, 0x00, 0x0a,
    // Reference list
    0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // Name list
    0x05, b'H', b'e', b'l', b'l', b'o',
];

fn resource(code: &[u8; 4], id: i16, name: Option<&str>, data: &[u8]) -> Resource {
    Resource {
        type_code: TypeCode::new(*code),
        id,
        name: name.map(|n| n.as_bytes().to_vec()),
        data: data.to_vec(),
    }
}

fn sample_map() -> ResourceMap {
    vec![
        resource(b"STR ", 128, Some("Greeting"), b"\x05Hello"),
        resource(b"STR ", 129, None, b"\x02Hi"),
        resource(b"TEXT", 1, Some("Read/Me"), b"\x03abc"),
        resource(b"snd ", -16455, None, b"\x00\x07"),
    ]
    .into_iter()
    .collect()
}

fn names(vfs: &Vfs, path: &str) -> Vec<String> {
    let mut entries: Vec<DirEntry> = Vec::new();
    vfs.readdir(path, &mut entries).unwrap();
    let mut names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
    names.sort();
    names
}

/// The documented fork mounts as a single two-byte file.
#[test]
fn test_hello_end_to_end() {
    let map = rsrc_format::from_bytes(&HELLO_FORK).unwrap();
    let vfs = Vfs::from_resources("hello", &map, &Translators::default(), TranslatorFilter::None);

    let attrs = vfs.getattr("/TEXT/128 Hello").unwrap();
    assert_eq!(attrs.kind, NodeKind::File);
    assert_eq!(attrs.size, 2);
    assert_eq!(attrs.mode, libc::S_IFREG as u32 | 0o444);
    assert_eq!(attrs.nlink, 1);

    assert_eq!(vfs.read("/TEXT/128 Hello", 2, 0).unwrap(), b"hi");
    assert_eq!(vfs.open("/TEXT/128 Hello", AccessMode::ReadOnly), Ok(()));
}

#[test]
fn test_folder_per_type() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::None);

    assert_eq!(names(&vfs, "/"), vec![".", "..", "STR ", "TEXT", "snd "]);
    assert_eq!(names(&vfs, "/STR "), vec![".", "..", "128 Greeting", "129"]);
    assert_eq!(names(&vfs, "/TEXT"), vec![".", "..", "1 ReadMe"]);
    assert_eq!(names(&vfs, "/snd "), vec!["-16455", ".", ".."]);

    let root = vfs.getattr("/").unwrap();
    assert_eq!(root.kind, NodeKind::Folder);
    assert_eq!(root.mode, libc::S_IFDIR as u32 | 0o555);
    assert_eq!(root.nlink, 5);
    assert_eq!(root.size, 0);
    assert_eq!(vfs.getattr("/STR ").unwrap().nlink, 2);
}

/// Leading, trailing and doubled separators name the same node.
#[test]
fn test_paths_are_normalized() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::None);
    let expected = vfs.getattr("/STR /129").unwrap();

    for path in ["STR /129", "/STR /129/", "//STR //129", "/STR /129//"] {
        assert_eq!(vfs.getattr(path).unwrap(), expected, "{path}");
    }
    assert_eq!(vfs.getattr("").unwrap(), vfs.getattr("/").unwrap());
}

#[test]
fn test_missing_paths() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::None);

    assert_eq!(vfs.getattr("/PICT"), Err(FsError::NotFound));
    assert_eq!(vfs.getattr("/STR /129/extra"), Err(FsError::NotFound));
    assert_eq!(vfs.read("/STR ", 10, 0), Err(FsError::NotFound));
    assert_eq!(vfs.open("/nope", AccessMode::ReadOnly), Err(FsError::NotFound));

    let mut entries: Vec<DirEntry> = Vec::new();
    assert_eq!(vfs.readdir("/STR /129", &mut entries), Err(FsError::NotFound));
}

#[test]
fn test_open_is_read_only() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::None);

    assert_eq!(vfs.open("/STR /129", AccessMode::ReadOnly), Ok(()));
    assert_eq!(vfs.open("/STR ", AccessMode::ReadOnly), Ok(()));
    assert_eq!(
        vfs.open("/STR /129", AccessMode::WriteOnly),
        Err(FsError::PermissionDenied)
    );
    assert_eq!(
        vfs.open("/STR /129", AccessMode::from_flags(libc::O_RDWR)),
        Err(FsError::PermissionDenied)
    );
}

#[test]
fn test_read_ranges() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::None);
    let path = "/STR /128 Greeting";

    assert_eq!(vfs.read(path, 4096, 0).unwrap(), b"\x05Hello");
    assert_eq!(vfs.read(path, 2, 1).unwrap(), b"He");
    assert_eq!(vfs.read(path, 100, 4).unwrap(), b"lo");
    assert_eq!(vfs.read(path, 1, 6).unwrap(), b"");
    assert_eq!(vfs.read(path, 1, 600).unwrap(), b"");
}

/// Likely translations appear next to the raw resource.
#[test]
fn test_likely_translations() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::Likely);

    assert_eq!(
        names(&vfs, "/STR "),
        vec![".", "..", "128 Greeting", "128 Greeting.txt", "129", "129.txt"]
    );
    assert_eq!(vfs.read("/STR /128 Greeting.txt", 100, 0).unwrap(), b"Hello");

    // TEXT holding a Pascal string is only a possible match.
    assert_eq!(names(&vfs, "/TEXT"), vec![".", "..", "1 ReadMe"]);

    // The snd translation fails; the raw resource is still there.
    assert_eq!(names(&vfs, "/snd "), vec!["-16455", ".", ".."]);
}

#[test]
fn test_possible_translations() {
    let vfs = Vfs::from_resources(
        "fork",
        &sample_map(),
        &Translators::default(),
        TranslatorFilter::LikelyAndPossible,
    );

    assert_eq!(names(&vfs, "/TEXT"), vec![".", "..", "1 ReadMe", "1 ReadMe.txt"]);
    assert_eq!(vfs.read("/TEXT/1 ReadMe.txt", 100, 0).unwrap(), b"abc");
}

/// Resources whose file names clash are all kept.
#[test]
fn test_colliding_names() {
    let map: ResourceMap = vec![
        resource(b"TEXT", 1, Some("a:b"), b"first"),
        resource(b"TEXT", 1, Some("ab"), b"second"),
    ]
    .into_iter()
    .collect();
    let vfs = Vfs::from_resources("fork", &map, &Translators::default(), TranslatorFilter::None);

    assert_eq!(names(&vfs, "/TEXT"), vec![".", "..", "1 ab", "1 ab (2)"]);
    assert_eq!(vfs.read("/TEXT/1 ab", 100, 0).unwrap(), b"first");
    assert_eq!(vfs.read("/TEXT/1 ab (2)", 100, 0).unwrap(), b"second");
}

struct Bounded {
    capacity: usize,
    names: Vec<String>,
}

impl DirectorySink for Bounded {
    fn push(&mut self, name: &str, _kind: NodeKind) -> bool {
        if self.names.len() == self.capacity {
            return false;
        }
        self.names.push(name.to_string());
        true
    }
}

/// A listing that does not fit aborts instead of returning partial results.
#[test]
fn test_listing_overflow() {
    let vfs = Vfs::from_resources("fork", &sample_map(), &Translators::default(), TranslatorFilter::None);

    let mut sink = Bounded {
        capacity: 3,
        names: Vec::new(),
    };
    assert_eq!(vfs.readdir("/", &mut sink), Err(FsError::ListingOverflow));

    let mut sink = Bounded {
        capacity: 5,
        names: Vec::new(),
    };
    assert_eq!(vfs.readdir("/", &mut sink), Ok(()));
    assert_eq!(&sink.names[..2], &[".", ".."]);
}
