//! Tag entries of one pass, kept in an arena and referenced by index.

use indenta_common::Symbol;

/// Index of an item in its [`ItemArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where an item is in its life.
/// 标签项所处的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Opening tag whose `>` was not seen yet.
    Open,
    /// Its `Indent`/`Return` goes to the start of the next line.
    Pending,
    /// Its `Indent`/`Return` was emitted.
    Emitted,
    /// Opened and closed before taking effect.
    Cancelled,
    /// Closing tag without an opening tag; ignored.
    Eliminated,
}

#[derive(Debug, Clone)]
pub struct MarkupItem {
    pub name: Symbol,
    pub opening: bool,
    pub optional_close: bool,
    pub children: Option<Vec<Symbol>>,
    pub empty: bool,
    /// Implied close with no source text.
    pub is_virtual: bool,
    pub foreign: bool,
    /// Offset of the tag-name token (or of the tag that implied the close).
    pub offset: usize,
    /// The opening item of a close.
    pub partner: Option<ItemId>,
    pub state: ItemState,
}

impl MarkupItem {
    pub fn opening(name: Symbol, offset: usize) -> Self {
        Self {
            name,
            opening: true,
            optional_close: false,
            children: None,
            empty: false,
            is_virtual: false,
            foreign: false,
            offset,
            partner: None,
            state: ItemState::Open,
        }
    }

    pub fn closing(name: Symbol, offset: usize, partner: Option<ItemId>, is_virtual: bool) -> Self {
        Self {
            opening: false,
            is_virtual,
            partner,
            ..Self::opening(name, offset)
        }
    }
}

/// Items of one pass.
#[derive(Debug, Default)]
pub struct ItemArena {
    items: Vec<MarkupItem>,
}

impl ItemArena {
    pub fn push(&mut self, item: MarkupItem) -> ItemId {
        self.items.push(item);
        ItemId(self.items.len() - 1)
    }

    pub fn get(&self, id: ItemId) -> &MarkupItem {
        &self.items[id.0]
    }

    pub fn get_mut(&mut self, id: ItemId) -> &mut MarkupItem {
        &mut self.items[id.0]
    }

    pub fn state(&self, id: ItemId) -> ItemState {
        self.items[id.0].state
    }

    /// Move an item to its next state. Returns false, leaving the item
    /// untouched, for transitions that cannot happen.
    pub fn transition(&mut self, id: ItemId, to: ItemState) -> bool {
        use ItemState::*;
        let item = &mut self.items[id.0];
        let allowed = matches!(
            (item.state, to),
            (Open, Pending)
                | (Open, Emitted)
                | (Open, Cancelled)
                | (Open, Eliminated)
                | (Pending, Emitted)
                | (Pending, Cancelled)
        );
        if allowed {
            item.state = to;
        } else {
            log::debug!(target: "indenta::markup", "ignoring transition {:?} -> {to:?} of {id:?}", item.state);
        }
        allowed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop every item not listed in `live` and renumber the rest, keeping
    /// their order. Returns the new id of each item, indexed by its old id.
    pub fn compact(&mut self, live: &[ItemId]) -> Vec<Option<ItemId>> {
        let mut keep = vec![false; self.items.len()];
        for id in live {
            keep[id.0] = true;
        }
        let mut remap = vec![None; self.items.len()];
        let mut next = 0;
        for (old, slot) in remap.iter_mut().enumerate() {
            if keep[old] {
                *slot = Some(ItemId(next));
                next += 1;
            }
        }
        let mut old = 0;
        self.items.retain(|_| {
            old += 1;
            keep[old - 1]
        });
        for item in &mut self.items {
            item.partner = item.partner.and_then(|p| remap[p.0]);
        }
        remap
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &MarkupItem)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i), item))
    }
}
