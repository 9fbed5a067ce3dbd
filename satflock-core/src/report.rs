use crate::Vector2D;

/// One detected pair, using tick-start positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from_index: usize,
    pub to_index: usize,
    pub from: Vector2D,
    pub to: Vector2D,
}

/// Receives the pairs found while stepping a flock
pub trait InteractionSink {
    /// Pair in the cohesion band
    fn record_link(&mut self, link: Link);
    /// Pair in the avoidance band
    fn record_avoid(&mut self, link: Link);
}

/// Discards everything
impl InteractionSink for () {
    fn record_link(&mut self, _link: Link) {}
    fn record_avoid(&mut self, _link: Link) {}
}

/// Pairs found during one tick, for drawing indicator lines
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionReport {
    pub link_pairs: Vec<Link>,
    pub avoid_pairs: Vec<Link>,
}

#[cfg(feature = "std")]
impl InteractionSink for InteractionReport {
    fn record_link(&mut self, link: Link) {
        self.link_pairs.push(link);
    }

    fn record_avoid(&mut self, link: Link) {
        self.avoid_pairs.push(link);
    }
}

/// Fixed-capacity report for embedded targets. Pairs beyond `M` per band
/// are counted in `dropped` instead of stored.
#[derive(Debug, Clone, Default)]
pub struct BoundedReport<const M: usize> {
    pub links: heapless::Vec<Link, M>,
    pub avoids: heapless::Vec<Link, M>,
    pub dropped: usize,
}

impl<const M: usize> BoundedReport<M> {
    pub fn new() -> Self {
        Self {
            links: heapless::Vec::new(),
            avoids: heapless::Vec::new(),
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.avoids.clear();
        self.dropped = 0;
    }
}

impl<const M: usize> InteractionSink for BoundedReport<M> {
    fn record_link(&mut self, link: Link) {
        if self.links.push(link).is_err() {
            self.dropped += 1;
        }
    }

    fn record_avoid(&mut self, link: Link) {
        if self.avoids.push(link).is_err() {
            self.dropped += 1;
        }
    }
}
