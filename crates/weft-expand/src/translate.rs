use smallvec::SmallVec;
use weft_source::{TextRange, TextSize};

use crate::call::{MacroCall, MacroExpansion};
use crate::db::ExpansionDb;
use crate::range_map::{MappedTextRange, MappingOutcome};

/// Map a virtual offset in the expansion of `call` to a virtual offset
/// in its body.
#[tracing::instrument(level = "trace", skip(db, call))]
pub fn map_offset_from_expansion_to_call_body(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    offset: TextSize,
) -> Option<TextSize> {
    let relative = map_offset_from_expansion_to_body_relative(db, call, offset)?;
    from_body_relative(db, call, relative)
}

/// Like `map_offset_from_expansion_to_call_body`, but stops short of
/// resolving the body position.
pub(crate) fn map_offset_from_expansion_to_body_relative(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    offset: TextSize,
) -> Option<TextSize> {
    let expansion = db.macro_expansion(call)?;
    let local = offset.checked_sub(expansion.context.expansion_file_start_offset)?;
    match expansion.ranges.map_offset_from_expansion_to_call_body(local) {
        MappingOutcome::Mapped(relative) => Some(relative),
        MappingOutcome::Unmapped => None,
        MappingOutcome::Ambiguous => {
            tracing::debug!(?offset, file = ?expansion.file, "ambiguous offset mapping");
            None
        }
    }
}

/// Map a virtual offset in the body of `call` to every virtual offset
/// in `expansion` it was copied to.
///
/// `None` when `offset` is outside the body; empty when the text at
/// `offset` was consumed by the macro without being echoed.
#[tracing::instrument(level = "trace", skip(db, call, expansion))]
pub fn map_offset_from_call_body_to_expansion(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    expansion: &MacroExpansion,
    offset: TextSize,
) -> Option<SmallVec<[TextSize; 1]>> {
    let relative = to_body_relative(db, call, offset)?;
    let base = expansion.context.expansion_file_start_offset;
    Some(
        expansion
            .ranges
            .map_offset_from_call_body_to_expansion(relative)
            .into_iter()
            .map(|local| local + base)
            .collect(),
    )
}

/// Map a virtual range of the expansion of `call` back to source.
///
/// Follows enclosing expansions until the fragments land in a genuine
/// file. A range made of several pieces of the call body maps to
/// several ranges, in expansion order. Ambiguity at any level, a
/// missing enclosing expansion or a chain deeper than the configured
/// limit rejects the whole mapping.
#[tracing::instrument(level = "trace", skip(db, call))]
pub fn map_range_from_expansion_to_call_body(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    range: TextRange,
) -> Vec<TextRange> {
    let limit = db.max_expansion_depth();
    let query = MappedTextRange::new(range.start(), range.start(), range.len());
    let mut work = vec![(call.clone(), query, 1usize)];
    let mut result = Vec::new();

    while let Some((call, query, depth)) = work.pop() {
        if depth > limit {
            tracing::debug!(depth, "expansion depth limit exceeded while mapping a range");
            return Vec::new();
        }
        let Some(expansion) = db.macro_expansion(&call) else {
            tracing::debug!(call = ?call.key(), "enclosing call has no expansion");
            return Vec::new();
        };
        let Some(local) = query.src_shift_left(expansion.context.expansion_file_start_offset)
        else {
            continue;
        };
        let fragments = match expansion.ranges.map_range_from_expansion_to_call_body(local) {
            MappingOutcome::Mapped(fragments) => fragments,
            MappingOutcome::Unmapped => continue,
            MappingOutcome::Ambiguous => {
                tracing::debug!(file = ?expansion.file, "ambiguous range mapping");
                return Vec::new();
            }
        };
        let Some(body) = call.body_text_range(db) else {
            continue;
        };
        let fragments = fragments
            .into_iter()
            .filter_map(|f| from_body_relative_range(f, body));

        match db.expansion_call(call.file_id()) {
            None => result.extend(fragments.map(|f| f.src_range())),
            Some(parent) => {
                let pending: Vec<_> = fragments.collect();
                // Reversed so the stack pops fragments in expansion order.
                work.extend(
                    pending
                        .into_iter()
                        .rev()
                        .map(|f| (parent.clone(), f, depth + 1)),
                );
            }
        }
    }
    result
}

/// Map a range to exactly one range of the same length in source.
pub fn map_range_from_expansion_to_call_body_strict(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    range: TextRange,
) -> Option<TextRange> {
    match map_range_from_expansion_to_call_body(db, call, range).as_slice() {
        [single] if single.len() == range.len() => Some(*single),
        _ => None,
    }
}

pub(crate) fn to_body_relative(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    offset: TextSize,
) -> Option<TextSize> {
    let body = call.body_text_range(db)?;
    if !body.contains(offset) {
        return None;
    }
    Some(offset - body.start())
}

pub(crate) fn from_body_relative(
    db: &dyn ExpansionDb,
    call: &MacroCall,
    relative: TextSize,
) -> Option<TextSize> {
    let body = call.body_text_range(db)?;
    let offset = body.start().checked_add(relative)?;
    if offset > body.end() {
        tracing::debug!(?offset, ?body, "mapped offset is past the end of the call body");
        return None;
    }
    Some(offset)
}

fn from_body_relative_range(fragment: MappedTextRange, body: TextRange) -> Option<MappedTextRange> {
    let shifted = fragment.src_shift_right(body.start())?;
    (shifted.src_offset <= body.end()).then_some(shifted)
}
