use weft_source::{ExpansionFrame, ExpansionKind, FileId, FileLoc, Span, TextRange, TextSize};

#[test]
fn file_loc_equality() {
    let a = FileLoc {
        file: FileId(0),
        offset: TextSize::new(10),
    };
    let b = FileLoc {
        file: FileId(0),
        offset: TextSize::new(10),
    };
    let c = FileLoc {
        file: FileId(1),
        offset: TextSize::new(10),
    };
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn span_start_is_point_location() {
    let span = Span::new(FileId(3), TextRange::new(TextSize::new(4), TextSize::new(9)));
    assert_eq!(
        span.start(),
        FileLoc {
            file: FileId(3),
            offset: TextSize::new(4),
        }
    );
}

#[test]
fn macro_frame_with_origin() {
    let call_site = Span {
        file: FileId(0),
        range: TextRange::new(TextSize::new(12), TextSize::new(20)),
    };
    let origin = FileLoc {
        file: FileId(0),
        offset: TextSize::new(17),
    };
    let frame = ExpansionFrame {
        kind: ExpansionKind::MacroCall,
        call_site,
        origin: Some(origin),
    };
    assert_eq!(frame.kind, ExpansionKind::MacroCall);
    assert!(frame.is_spelled_at_call_site());
    assert_eq!(frame.origin.map(|o| o.offset), Some(TextSize::new(17)));
}

#[test]
fn include_frame_without_origin() {
    let frame = ExpansionFrame {
        kind: ExpansionKind::Include,
        call_site: Span::new(FileId(0), TextRange::empty(TextSize::new(0))),
        origin: None,
    };
    assert!(!frame.is_spelled_at_call_site());
}
