//! A size-keyed free-list cache sitting in front of an allocation policy.
//!
//! Deallocated blocks aren't handed back to the [`AllocationPolicy`]
//! straight away. Instead they are parked in a free-list keyed by their size
//! and handed out again by the next [`Pool::allocate()`] of the same size.
//! Cached memory is only released by [`Pool::clean()`] or when the pool is
//! dropped.

use std::collections::HashMap;

/// A handle to a block owned by a [`Pool`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    #[must_use]
    pub const fn index(self) -> u32 { self.0 }

    fn slot(self) -> usize { self.0 as usize }
}

/// Where a [`Pool`] gets its memory from when the free-list is empty.
pub trait AllocationPolicy<T> {
    /// Allocate an empty block.
    fn allocate(&mut self) -> Box<Option<T>>;

    /// Give a block back to the system.
    fn deallocate(&mut self, block: Box<Option<T>>);
}

/// Use the global allocator.
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardPolicy;

impl<T> AllocationPolicy<T> for StandardPolicy {
    fn allocate(&mut self) -> Box<Option<T>> { Box::new(None) }

    fn deallocate(&mut self, block: Box<Option<T>>) { drop(block); }
}

/// Counters describing what a [`Pool`] has been doing.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct PoolStats {
    /// Blocks currently holding a value.
    pub live: usize,
    /// Empty blocks waiting in the free-list.
    pub cached: usize,
    /// How many times the [`AllocationPolicy`] was asked for a new block.
    pub fresh_allocations: usize,
    /// How many allocations were served from the free-list.
    pub reuses: usize,
    /// How many blocks were given back to the [`AllocationPolicy`].
    pub releases: usize,
}

#[derive(Debug)]
struct Block<T> {
    cell: Box<Option<T>>,
    size: usize,
}

/// A single-threaded object pool.
#[derive(Debug)]
pub struct Pool<T, P: AllocationPolicy<T> = StandardPolicy> {
    blocks: Vec<Option<Block<T>>>,
    /// Previously used blocks, keyed by size.
    free: HashMap<usize, Vec<BlockId>>,
    /// Slots in `blocks` with nothing in them.
    vacant: Vec<u32>,
    pooled: bool,
    policy: P,
    stats: PoolStats,
}

impl<T> Pool<T> {
    pub fn new() -> Self { Pool::with_policy(StandardPolicy) }

    /// A pool which gives every block straight back to the system when it
    /// is deallocated.
    pub fn unpooled() -> Self {
        let mut pool = Pool::new();
        pool.pooled = false;
        pool
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self { Pool::new() }
}

impl<T, P: AllocationPolicy<T>> Pool<T, P> {
    pub fn with_policy(policy: P) -> Self {
        Pool {
            blocks: Vec::new(),
            free: HashMap::new(),
            vacant: Vec::new(),
            pooled: true,
            policy,
            stats: PoolStats::default(),
        }
    }

    pub fn is_pooled(&self) -> bool { self.pooled }

    pub fn policy(&self) -> &P { &self.policy }

    pub fn stats(&self) -> PoolStats { self.stats }

    /// Store `value` in a block of `size` bytes, reusing a cached block of
    /// exactly that size if there is one.
    pub fn allocate(&mut self, size: usize, value: T) -> BlockId {
        if let Some(id) = self.free.get_mut(&size).and_then(|ids| ids.pop()) {
            if let Some(block) = self.blocks[id.slot()].as_mut() {
                *block.cell = Some(value);
                self.stats.cached -= 1;
                self.stats.reuses += 1;
                self.stats.live += 1;
                return id;
            }
        }

        let mut cell = self.policy.allocate();
        *cell = Some(value);
        self.stats.fresh_allocations += 1;
        self.stats.live += 1;

        let block = Some(Block { cell, size });

        match self.vacant.pop() {
            Some(index) => {
                self.blocks[index as usize] = block;
                BlockId(index)
            },
            None => {
                let index = self.blocks.len() as u32;
                self.blocks.push(block);
                BlockId(index)
            },
        }
    }

    /// Take the value out of a block and park the block in the free-list.
    ///
    /// Deallocating an unknown or already free block does nothing.
    pub fn deallocate(&mut self, id: BlockId) -> Option<T> {
        let block = self.blocks.get_mut(id.slot())?.as_mut()?;
        let value = block.cell.take()?;
        let size = block.size;
        self.stats.live -= 1;

        if self.pooled {
            self.free.entry(size).or_default().push(id);
            self.stats.cached += 1;
        } else {
            self.release(id);
        }

        Some(value)
    }

    /// Give every cached block back to the [`AllocationPolicy`].
    pub fn clean(&mut self) {
        let free = std::mem::take(&mut self.free);
        let mut released = 0;

        for id in free.into_iter().flat_map(|(_, ids)| ids) {
            self.release(id);
            released += 1;
        }

        self.stats.cached = 0;

        if released > 0 {
            log::debug!("Released {} cached blocks", released);
        }
    }

    pub fn get(&self, id: BlockId) -> Option<&T> {
        match self.block(id) {
            Some(block) => Option::as_ref(&*block.cell),
            None => None,
        }
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut T> {
        match self.blocks.get_mut(id.slot()) {
            Some(Some(block)) => Option::as_mut(&mut *block.cell),
            _ => None,
        }
    }

    /// The heap address backing a block, live or cached.
    pub fn address(&self, id: BlockId) -> Option<usize> {
        self.block(id)
            .map(|block| &*block.cell as *const Option<T> as usize)
    }

    fn block(&self, id: BlockId) -> Option<&Block<T>> {
        self.blocks.get(id.slot()).and_then(Option::as_ref)
    }

    fn release(&mut self, id: BlockId) {
        if let Some(block) = self.blocks.get_mut(id.slot()).and_then(Option::take)
        {
            self.policy.deallocate(block.cell);
            self.vacant.push(id.0);
            self.stats.releases += 1;
        }
    }
}

impl<T, P: AllocationPolicy<T>> Drop for Pool<T, P> {
    fn drop(&mut self) {
        self.clean();

        for block in self.blocks.drain(..).flatten() {
            self.policy.deallocate(block.cell);
        }

        log::debug!("Dropped a pool, {:?}", self.stats);
    }
}
