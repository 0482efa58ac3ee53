use smallvec::SmallVec;
use weft_source::{TextRange, TextSize};

/// A unit of the expansion mapping: `len` bytes at `dst_offset` in the
/// expansion file were copied from `src_offset` in the call body.
///
/// `src_offset` is relative to the start of the call body and
/// `dst_offset` is local to the expansion file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappedTextRange {
    pub src_offset: TextSize,
    pub dst_offset: TextSize,
    pub len: TextSize,
}

impl MappedTextRange {
    pub fn new(src_offset: TextSize, dst_offset: TextSize, len: TextSize) -> Self {
        Self {
            src_offset,
            dst_offset,
            len,
        }
    }

    pub fn src_end(&self) -> TextSize {
        self.src_offset + self.len
    }

    pub fn dst_end(&self) -> TextSize {
        self.dst_offset + self.len
    }

    pub fn src_range(&self) -> TextRange {
        TextRange::at(self.src_offset, self.len)
    }

    pub fn dst_range(&self) -> TextRange {
        TextRange::at(self.dst_offset, self.len)
    }

    /// Move the source side `delta` bytes towards the start.
    /// `None` if that would go below zero.
    pub fn src_shift_left(self, delta: TextSize) -> Option<Self> {
        let src_offset = self.src_offset.checked_sub(delta)?;
        Some(Self { src_offset, ..self })
    }

    pub fn src_shift_right(self, delta: TextSize) -> Option<Self> {
        let src_offset = self.src_offset.checked_add(delta)?;
        Some(Self { src_offset, ..self })
    }

    /// The part of this unit whose destination lies inside `range`.
    ///
    /// An empty `range` selects the point it sits on, provided the unit
    /// covers that point.
    pub fn dst_intersection(&self, range: TextRange) -> Option<Self> {
        let common = if range.is_empty() {
            if !self.dst_range().contains(range.start()) {
                return None;
            }
            range
        } else {
            let common = self.dst_range().intersect(range)?;
            if common.is_empty() {
                return None;
            }
            common
        };
        let delta = common.start() - self.dst_offset;
        Some(Self {
            src_offset: self.src_offset + delta,
            dst_offset: common.start(),
            len: common.len(),
        })
    }
}

/// The result of a lookup that can fail two distinct ways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome<T> {
    Mapped(T),
    /// Nothing in the map covers the query.
    Unmapped,
    /// More than one unit covers the query, so no single answer exists.
    Ambiguous,
}

impl<T> MappingOutcome<T> {
    pub fn mapped(self) -> Option<T> {
        match self {
            MappingOutcome::Mapped(value) => Some(value),
            MappingOutcome::Unmapped | MappingOutcome::Ambiguous => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, MappingOutcome::Mapped(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MappingOutcome::Ambiguous)
    }
}

/// Correspondence between a macro call body and its expansion.
///
/// Units are kept sorted by destination offset. The destination side of
/// a map produced by an expander never overlaps, while the source side
/// may (one argument token echoed several times). Maps whose
/// destinations do overlap are accepted and answered by linear scan,
/// reporting `Ambiguous` where a query has more than one answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeMap {
    ranges: Vec<MappedTextRange>,
    dst_disjoint: bool,
}

impl RangeMap {
    pub fn new(mut ranges: Vec<MappedTextRange>) -> Self {
        ranges.sort_by_key(|r| (r.dst_offset, r.src_offset));
        let dst_disjoint = ranges.windows(2).all(|w| w[0].dst_end() <= w[1].dst_offset);
        Self {
            ranges,
            dst_disjoint,
        }
    }

    pub fn ranges(&self) -> &[MappedTextRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_dst_disjoint(&self) -> bool {
        self.dst_disjoint
    }

    /// Map an offset in the expansion file to a body-relative offset.
    pub fn map_offset_from_expansion_to_call_body(
        &self,
        offset: TextSize,
    ) -> MappingOutcome<TextSize> {
        if self.dst_disjoint {
            return match self.find_unit(offset) {
                Some(unit) => MappingOutcome::Mapped(unit.src_offset + (offset - unit.dst_offset)),
                None => MappingOutcome::Unmapped,
            };
        }
        let mut found = None;
        for unit in self.ranges.iter().filter(|r| r.dst_range().contains(offset)) {
            if found.is_some() {
                return MappingOutcome::Ambiguous;
            }
            found = Some(unit.src_offset + (offset - unit.dst_offset));
        }
        found.map_or(MappingOutcome::Unmapped, MappingOutcome::Mapped)
    }

    /// Map a body-relative offset to every expansion offset it was copied to.
    ///
    /// Empty when the token was consumed without being echoed.
    pub fn map_offset_from_call_body_to_expansion(
        &self,
        offset: TextSize,
    ) -> SmallVec<[TextSize; 1]> {
        self.ranges
            .iter()
            .filter(|r| r.src_range().contains(offset))
            .map(|r| r.dst_offset + (offset - r.src_offset))
            .collect()
    }

    /// Map a range of the expansion to the call body, fragment by fragment.
    ///
    /// `query.src_offset..+len` is the position being looked up in the
    /// expansion; `query.dst_offset` is carried along so each fragment
    /// records which part of the original query it covers. Fragments
    /// covering a common part of the query make the answer `Ambiguous`.
    pub fn map_range_from_expansion_to_call_body(
        &self,
        query: MappedTextRange,
    ) -> MappingOutcome<Vec<MappedTextRange>> {
        let position = query.src_range();
        let candidates = if self.dst_disjoint {
            let first = self
                .ranges
                .partition_point(|r| r.dst_end() <= position.start());
            &self.ranges[first..]
        } else {
            &self.ranges[..]
        };

        let mut fragments: Vec<MappedTextRange> = Vec::new();
        for unit in candidates {
            if self.dst_disjoint && unit.dst_offset > position.end() {
                break;
            }
            let Some(part) = unit.dst_intersection(position) else {
                continue;
            };
            let fragment = MappedTextRange::new(
                part.src_offset,
                query.dst_offset + (part.dst_offset - position.start()),
                part.len,
            );
            if fragments.iter().any(|f| overlaps(f.dst_range(), fragment.dst_range())) {
                return MappingOutcome::Ambiguous;
            }
            fragments.push(fragment);
        }

        if fragments.is_empty() {
            MappingOutcome::Unmapped
        } else {
            MappingOutcome::Mapped(fragments)
        }
    }

    fn find_unit(&self, offset: TextSize) -> Option<&MappedTextRange> {
        let idx = self.ranges.partition_point(|r| r.dst_end() <= offset);
        // Skip empty units sitting exactly at `offset`.
        self.ranges[idx..]
            .iter()
            .take_while(|r| r.dst_offset <= offset)
            .find(|r| r.dst_range().contains(offset))
    }
}

// Two ranges share at least one position. Empty ranges share their point.
fn overlaps(a: TextRange, b: TextRange) -> bool {
    if a.is_empty() || b.is_empty() {
        return a.start() == b.start();
    }
    a.start() < b.end() && b.start() < a.end()
}

impl FromIterator<MappedTextRange> for RangeMap {
    fn from_iter<I: IntoIterator<Item = MappedTextRange>>(iter: I) -> Self {
        RangeMap::new(iter.into_iter().collect())
    }
}
