use weft_ast::{AstNode, Attr, Item, MacroArgument};
use weft_source::{FileId, TextSize};

use crate::call::MacroCall;
use crate::db::ExpansionDb;
use crate::offsets::{self, element_node, is_file_level, token_starting_at};
use crate::translate;
use crate::{FileElement, FileNode, FileToken};

/// The call that directly produced `node`.
///
/// Only file-level nodes of an expansion file are produced by a call;
/// everything below them is reached through them.
pub fn expanded_from(db: &dyn ExpansionDb, node: &FileNode) -> Option<MacroCall> {
    if !is_file_level(&node.value) {
        return None;
    }
    db.expansion_call(node.file_id)
}

/// The innermost call `element` was expanded from.
pub fn find_macro_call_expanded_from_non_recursive(
    db: &dyn ExpansionDb,
    element: &FileElement,
) -> Option<MacroCall> {
    element_node(&element.value)?
        .ancestors()
        .find_map(|node| expanded_from(db, &element.with_value(node)))
}

fn call_expanded_from(db: &dyn ExpansionDb, call: &MacroCall) -> Option<MacroCall> {
    let element = FileElement::new(call.file_id(), call.syntax().clone().into());
    find_macro_call_expanded_from_non_recursive(db, &element)
}

/// Iterator over the calls an element was expanded from, innermost
/// first. Ends after `max_expansion_depth` calls even if the chain
/// goes on; `exceeded_limit` tells the two apart.
pub struct ExpandedFromChain<'db> {
    db: &'db dyn ExpansionDb,
    next: Option<MacroCall>,
    yielded: usize,
    limit: usize,
}

impl ExpandedFromChain<'_> {
    /// Whether the chain was cut short by the depth limit.
    pub fn exceeded_limit(&self) -> bool {
        self.yielded >= self.limit && self.next.is_some()
    }
}

impl Iterator for ExpandedFromChain<'_> {
    type Item = MacroCall;

    fn next(&mut self) -> Option<MacroCall> {
        if self.yielded >= self.limit {
            if self.next.is_some() {
                tracing::debug!(limit = self.limit, "expansion depth limit exceeded");
            }
            return None;
        }
        let call = self.next.take()?;
        self.next = call_expanded_from(self.db, &call);
        self.yielded += 1;
        Some(call)
    }
}

pub fn expanded_from_chain<'db>(
    db: &'db dyn ExpansionDb,
    element: &FileElement,
) -> ExpandedFromChain<'db> {
    ExpandedFromChain {
        db,
        next: find_macro_call_expanded_from_non_recursive(db, element),
        yielded: 0,
        limit: db.max_expansion_depth(),
    }
}

/// The outermost call `element` was expanded from, which lives in a
/// genuine file. `None` past the depth limit.
pub fn find_macro_call_expanded_from(
    db: &dyn ExpansionDb,
    element: &FileElement,
) -> Option<MacroCall> {
    let mut chain = expanded_from_chain(db, element);
    let outermost = chain.by_ref().last()?;
    (!chain.exceeded_limit()).then_some(outermost)
}

/// Number of expansions between `element` and genuine source: `Some(0)`
/// outside of expansions, `None` past the depth limit.
pub fn calculate_macro_expansion_depth(db: &dyn ExpansionDb, element: &FileElement) -> Option<usize> {
    let mut chain = expanded_from_chain(db, element);
    let depth = chain.by_ref().count();
    (!chain.exceeded_limit()).then_some(depth)
}

pub fn is_expanded_from_macro(db: &dyn ExpansionDb, element: &FileElement) -> bool {
    find_macro_call_expanded_from_non_recursive(db, element).is_some()
}

/// The `include!` call that spliced in the file holding `element`.
pub fn included_from(db: &dyn ExpansionDb, element: &FileElement) -> Option<MacroCall> {
    db.included_from(element.file_id)
}

pub fn is_expanded_from_include_macro(db: &dyn ExpansionDb, element: &FileElement) -> bool {
    included_from(db, element).is_some()
}

/// The call that produced `node`, by expansion or by inclusion.
pub fn expanded_or_included_from(db: &dyn ExpansionDb, node: &FileNode) -> Option<MacroCall> {
    expanded_from(db, node).or_else(|| {
        if !is_file_level(&node.value) {
            return None;
        }
        db.included_from(node.file_id)
    })
}

/// Follow the start of `element` out through the calls it was expanded
/// from, as far as it maps. Returns the last call reached and the
/// virtual offset in its file.
fn find_macro_call_and_offset(
    db: &dyn ExpansionDb,
    file: FileId,
    offset: TextSize,
) -> Option<(MacroCall, TextSize)> {
    let limit = db.max_expansion_depth();
    let mut file = file;
    let mut offset = offset;
    let mut reached = None;
    let mut depth = 0usize;

    while let Some(call) = db.expansion_call(file) {
        if depth == limit {
            tracing::debug!(limit, "expansion depth limit exceeded while mapping an offset");
            return None;
        }
        let Some(mapped) = translate::map_offset_from_expansion_to_call_body(db, &call, offset)
        else {
            break;
        };
        depth += 1;
        file = call.file_id();
        offset = mapped;
        reached = Some((call, mapped));
    }
    reached
}

/// The token in a call body that the first token of `element` was
/// expanded from.
///
/// When the element maps through some calls but not all the way out,
/// the token in the last call it maps into is returned. `strict`
/// rejects such tokens: the result must lie outside any expansion.
pub fn find_element_expanded_from(
    db: &dyn ExpansionDb,
    element: &FileElement,
    strict: bool,
) -> Option<FileToken> {
    let start = offsets::element_start(db, element)?;
    let (call, offset) = find_macro_call_and_offset(db, element.file_id, start)?;
    let token = token_starting_at(db, call.file_id(), offset)?;
    if strict && is_expanded_from_macro(db, &token.clone().map(Into::into)) {
        return None;
    }
    Some(token)
}

/// The call holding the token `element` was expanded from, see
/// `find_element_expanded_from` with `strict == false`.
pub fn find_macro_call_from_which_leaf_is_expanded(
    db: &dyn ExpansionDb,
    element: &FileElement,
) -> Option<MacroCall> {
    let start = offsets::element_start(db, element)?;
    find_macro_call_and_offset(db, element.file_id, start).map(|(call, _)| call)
}

/// Every token of expansion output that `token` was copied to,
/// following nested expansions to the innermost copies.
///
/// `None` when `token` is not in the body of a call or the call did not
/// expand; empty when the macro consumed `token` without echoing it.
/// Order is depth first, in expansion order at each level.
pub fn find_expansion_elements(db: &dyn ExpansionDb, token: &FileToken) -> Option<Vec<FileToken>> {
    let limit = db.max_expansion_depth();
    let first = find_expansion_elements_non_recursive(db, token)?;
    let mut stack: Vec<(FileToken, usize)> = first.into_iter().rev().map(|t| (t, 1)).collect();
    let mut result = Vec::new();

    while let Some((token, depth)) = stack.pop() {
        match find_expansion_elements_non_recursive(db, &token) {
            Some(mapped) => {
                if depth >= limit {
                    tracing::debug!(limit, "expansion depth limit exceeded while following a token");
                    return None;
                }
                stack.extend(mapped.into_iter().rev().map(|t| (t, depth + 1)));
            }
            None => result.push(token),
        }
    }
    Some(result)
}

fn find_expansion_elements_non_recursive(
    db: &dyn ExpansionDb,
    token: &FileToken,
) -> Option<Vec<FileToken>> {
    let call = call_with_body_holding(token)?;
    let expansion = db.macro_expansion(&call)?;
    let start = offsets::element_start(db, &token.clone().map(Into::into))?;
    let offsets = translate::map_offset_from_call_body_to_expansion(db, &call, &expansion, start)?;
    Some(
        offsets
            .into_iter()
            .filter_map(|offset| token_starting_at(db, expansion.file, offset))
            .collect(),
    )
}

// The outermost call whose input contains `token`: a function-like
// call around its argument, or the attribute macro of an enclosing item.
fn call_with_body_holding(token: &FileToken) -> Option<MacroCall> {
    let ancestors: Vec<_> = token.value.parent_ancestors().collect();
    ancestors.iter().rev().find_map(|node| {
        if let Some(argument) = MacroArgument::cast(node.clone()) {
            let call = weft_ast::MacroCall::cast(argument.syntax().parent()?)?;
            return Some(MacroCall::fn_like(token.file_id, &call));
        }
        let item = Item::cast(node.clone())?;
        let attr = item.attrs().find(|attr: &Attr| !attr.is_derive())?;
        MacroCall::attr(token.file_id, &attr)
    })
}
