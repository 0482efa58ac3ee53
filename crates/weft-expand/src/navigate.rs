use weft_ast::{AstNode, Item};
use weft_parser::SyntaxKind;
use weft_source::{ExpansionFrame, ExpansionKind, FileId, FileLoc, InFile, Span, TextRange, TextSize};

use crate::call::MacroCall;
use crate::db::ExpansionDb;
use crate::locate::{
    find_element_expanded_from, find_expansion_elements, find_macro_call_expanded_from,
    find_macro_call_expanded_from_non_recursive,
};
use crate::offsets::{self, element_node};
use crate::translate;
use crate::{FileElement, FileToken};

/// Where to navigate for an element inside an expansion: the source
/// token it was expanded from, or else the path of the outermost call.
///
/// For a named item the name is followed instead of the item's first
/// token. `None` outside of expansions.
pub fn find_navigation_target_if_macro_expansion(
    db: &dyn ExpansionDb,
    element: &FileElement,
) -> Option<FileElement> {
    let named = element
        .value
        .as_node()
        .cloned()
        .and_then(Item::cast)
        .and_then(|item| item.name_token())
        .map(|name| element.with_value(name.into()));
    let target = named.as_ref().unwrap_or(element);
    if let Some(token) = find_element_expanded_from(db, target, true) {
        return Some(token.map(Into::into));
    }
    let call = find_macro_call_expanded_from(db, element)?;
    let path = call.path_element()?;
    Some(InFile::new(call.file_id(), path))
}

/// The single expansion token `token` was copied to, or `token` itself
/// when there is none or more than one.
pub fn find_expansion_element_or_self(db: &dyn ExpansionDb, token: &FileToken) -> FileToken {
    match find_expansion_elements(db, token).as_deref() {
        Some([single]) => single.clone(),
        _ => token.clone(),
    }
}

/// Whether the start of `element` was written in the argument of the
/// function-like call that directly produced it, rather than coming
/// from the macro definition. Used for hygiene.
pub fn came_from_macro_call(db: &dyn ExpansionDb, element: &FileElement) -> bool {
    let Some(call) = find_macro_call_expanded_from_non_recursive(db, element) else {
        return false;
    };
    if !call.is_fn_like() {
        return false;
    }
    offsets::element_start(db, element)
        .and_then(|start| translate::map_offset_from_expansion_to_body_relative(db, &call, start))
        .is_some()
}

/// Position in `original_file` for an inlay hint anchored in expanded
/// code.
///
/// `anchor_offset` and `enclosing_range` (the statement around the
/// anchor) are virtual positions in the file holding `anchor`. Both are
/// mapped out call by call until `original_file` is reached. The
/// mapping is rejected when the enclosing range is not copied whole from
/// a single piece of the call body, as the hint would have no
/// surrounding context at the call site.
pub fn find_original_offset(
    db: &dyn ExpansionDb,
    anchor: &FileElement,
    anchor_offset: TextSize,
    enclosing_range: TextRange,
    original_file: FileId,
) -> Option<TextSize> {
    let limit = db.max_expansion_depth();
    let mut file = anchor.file_id;
    let mut offset = anchor_offset;
    let mut range = enclosing_range;

    for _ in 0..limit {
        let call = db.expansion_call(file)?;
        let expansion = db.macro_expansion(&call)?;
        let base = expansion.context.expansion_file_start_offset;
        let body_start = call.body_text_range(db)?.start();
        let ranges = &expansion.ranges;

        let local_offset = offset.checked_sub(base)?;
        let mapped_offset = ranges
            .map_offset_from_expansion_to_call_body(local_offset)
            .mapped()?
            + body_start;

        let local_range = TextRange::new(
            range.start().checked_sub(base)?,
            range.end().checked_sub(base)?,
        );
        let mut containing = ranges
            .ranges()
            .iter()
            .filter(|unit| unit.dst_range().contains_range(local_range));
        let unit = containing.next()?;
        if containing.next().is_some() {
            return None;
        }
        let relative_range = local_range - unit.dst_offset + unit.src_offset;
        let sources = ranges
            .ranges()
            .iter()
            .filter(|unit| unit.src_range().intersect(relative_range).is_some())
            .count();
        if sources != 1 {
            return None;
        }

        if call.file_id() == original_file {
            return Some(mapped_offset);
        }
        file = call.file_id();
        offset = mapped_offset;
        range = relative_range + body_start;
    }
    tracing::debug!(limit, "expansion depth limit exceeded while placing an inlay hint");
    None
}

/// `find_original_offset` for the end of `anchor`, using its enclosing
/// statement as context. In `original_file` itself that is just the end.
pub fn inlay_hint_offset(
    db: &dyn ExpansionDb,
    anchor: &FileElement,
    original_file: FileId,
) -> Option<TextSize> {
    let range = offsets::element_range(db, anchor)?;
    if anchor.file_id == original_file {
        return Some(range.end());
    }
    let statement = element_node(&anchor.value)?
        .ancestors()
        .find(|n| matches!(n.kind(), SyntaxKind::LetStmt | SyntaxKind::ExprStmt))?;
    let statement_range = offsets::element_range(db, &anchor.with_value(statement.into()))?;
    find_original_offset(db, anchor, range.end(), statement_range, original_file)
}

/// The calls and includes between `element` and genuine source,
/// innermost first.
///
/// Each frame carries the location the element's first token was
/// spelled at in the file holding the call, when it was written there.
/// Once a token stops mapping (it came from a macro definition, or from
/// an included file) the outer frames follow the inner call instead.
pub fn expansion_frames(db: &dyn ExpansionDb, element: &FileElement) -> Vec<ExpansionFrame> {
    let limit = db.max_expansion_depth();
    let mut frames = Vec::new();
    let mut file = element.file_id;
    let mut offset = offsets::element_start(db, element);

    while frames.len() < limit {
        if let Some(call) = db.expansion_call(file) {
            let mapped =
                offset.and_then(|o| translate::map_offset_from_expansion_to_call_body(db, &call, o));
            let origin = mapped.and_then(|o| local_loc(db, call.file_id(), o));
            frames.push(ExpansionFrame {
                kind: ExpansionKind::MacroCall,
                call_site: Span::new(call.file_id(), call.syntax().text_range()),
                origin,
            });
            file = call.file_id();
            offset = mapped.or_else(|| call_start(db, &call));
        } else if let Some(call) = db.included_from(file) {
            let origin = offset.and_then(|o| local_loc(db, file, o));
            frames.push(ExpansionFrame {
                kind: ExpansionKind::Include,
                call_site: Span::new(call.file_id(), call.syntax().text_range()),
                origin,
            });
            file = call.file_id();
            offset = call_start(db, &call);
        } else {
            return frames;
        }
    }
    tracing::debug!(limit, "expansion depth limit exceeded while collecting frames");
    frames
}

fn call_start(db: &dyn ExpansionDb, call: &MacroCall) -> Option<TextSize> {
    let base = offsets::file_start_offset(db, call.file_id())?;
    Some(base + call.syntax().text_range().start())
}

fn local_loc(db: &dyn ExpansionDb, file: FileId, offset: TextSize) -> Option<FileLoc> {
    let base = offsets::file_start_offset(db, file)?;
    Some(FileLoc {
        file,
        offset: offset.checked_sub(base)?,
    })
}
