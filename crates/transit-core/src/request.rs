//! Transit requests (what a source offers) and responses (what a destination
//! is predicted to take).

use crate::item::ItemStack;
use crate::oracle::{InventoryOracle, OracleFault};

/// One candidate line of a request: an item identity, a total count, and the
/// source slots that count was gathered from.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemData {
    /// Identity of the line, sized to the total count.
    stack: ItemStack,
    /// `(slot, count)` pairs in gathering order; counts sum to the total.
    sources: Vec<(usize, u32)>,
}

impl ItemData {
    pub fn stack(&self) -> &ItemStack {
        &self.stack
    }

    pub fn total_count(&self) -> u32 {
        self.stack.quantity
    }

    pub fn sources(&self) -> &[(usize, u32)] {
        &self.sources
    }

    /// Totals saturate at `u32::MAX`.
    fn add(&mut self, slot: Option<usize>, quantity: u32) {
        self.stack.quantity = self.stack.quantity.saturating_add(quantity);
        if let Some(slot) = slot {
            self.sources.push((slot, quantity));
        }
    }
}

/// An ordered batch of candidate lines. Lines are tried in order; the first
/// one a destination accepts (even partially) is the one that gets sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitRequest {
    lines: Vec<ItemData>,
}

impl TransitRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request with a single line for `stack`.
    pub fn single(stack: ItemStack) -> Self {
        let mut request = Self::new();
        request.push(stack);
        request
    }

    /// Append `stack` to the request, merging into an existing stackable line.
    /// Empty stacks are ignored.
    pub fn push(&mut self, stack: ItemStack) {
        if stack.is_empty() {
            return;
        }
        match self.lines.iter_mut().find(|l| l.stack.is_stackable_with(&stack)) {
            Some(line) => line.add(None, stack.quantity),
            None => self.lines.push(ItemData {
                stack,
                sources: Vec::new(),
            }),
        }
    }

    /// Gather a request from a source inventory.
    ///
    /// Slots are walked in order; stackable contents are pooled into one line
    /// per identity, each capped at `max_per_line` units. Lines appear in the
    /// order their identity was first seen.
    pub fn from_source<S: InventoryOracle + ?Sized>(
        source: &S,
        max_per_line: u32,
    ) -> Result<Self, OracleFault> {
        let mut lines: Vec<ItemData> = Vec::new();
        if max_per_line == 0 {
            return Ok(Self { lines });
        }
        for slot in 0..source.slot_count()? {
            let stack = source.stack_in_slot(slot)?;
            if stack.is_empty() {
                continue;
            }
            match lines.iter_mut().find(|l| l.stack.is_stackable_with(&stack)) {
                Some(line) => {
                    let room = max_per_line - line.total_count();
                    if room > 0 {
                        line.add(Some(slot), room.min(stack.quantity));
                    }
                }
                None => {
                    let taken = stack.quantity.min(max_per_line);
                    lines.push(ItemData {
                        stack: stack.with_quantity(taken),
                        sources: vec![(slot, taken)],
                    });
                }
            }
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[ItemData] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn empty_response(&self) -> TransitResponse {
        TransitResponse::Empty
    }

    /// Response sending `quantity` units of line `line`.
    pub fn create_response(&self, line: usize, quantity: u32) -> TransitResponse {
        match self.lines.get(line) {
            Some(data) if quantity > 0 => TransitResponse::Send {
                line,
                stack: data.stack.with_quantity(quantity.min(data.total_count())),
            },
            _ => TransitResponse::Empty,
        }
    }
}

/// Outcome of a prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitResponse {
    /// Nothing can be sent to this destination right now.
    Empty,
    /// Send `stack` (sized to the admitted amount), drawn from request line `line`.
    Send { line: usize, stack: ItemStack },
}

impl TransitResponse {
    pub fn is_empty(&self) -> bool {
        matches!(self, TransitResponse::Empty)
    }

    pub fn stack(&self) -> Option<&ItemStack> {
        match self {
            TransitResponse::Empty => None,
            TransitResponse::Send { stack, .. } => Some(stack),
        }
    }

    pub fn sending_amount(&self) -> u32 {
        self.stack().map_or(0, |s| s.quantity)
    }

    /// Which source slots to draw the admitted amount from, and how much from each.
    pub fn extraction_plan(&self, request: &TransitRequest) -> Vec<(usize, u32)> {
        let TransitResponse::Send { line, stack } = self else {
            return Vec::new();
        };
        let Some(data) = request.lines.get(*line) else {
            return Vec::new();
        };
        let mut remaining = stack.quantity;
        let mut plan = Vec::new();
        for &(slot, available) in &data.sources {
            if remaining == 0 {
                break;
            }
            let take = available.min(remaining);
            plan.push((slot, take));
            remaining -= take;
        }
        plan
    }
}

/// Whether any of `sent` left the source, given what came back.
pub fn did_emit(sent: &ItemStack, returned: &ItemStack) -> bool {
    returned.is_empty() || returned.quantity < sent.quantity
}

/// The part of `sent` that was actually used, given what came back.
pub fn to_use(sent: &ItemStack, returned: &ItemStack) -> ItemStack {
    if returned.is_empty() {
        sent.clone()
    } else {
        sent.with_quantity(sent.quantity.saturating_sub(returned.quantity))
    }
}
