//! Recent path tracker
//!
//! Records a lossy trail of recent positions in a fixed ring of 16-bit
//! records so a return mode can retrace the path flown (newest first).
//!
//! # Representation
//!
//! Positions live in a local NED frame anchored at home (`z` is the
//! height below the anchor). The ring stores each point as a
//! [`RelativeOffset`] from its predecessor in `ACCURACY` units, and the
//! absolute position of the newest point is kept in `head`. The oldest
//! record is a sentinel: it only marks the path as non-empty.
//!
//! - Points closer than `ACCURACY` to the head are discarded
//! - Deltas are rounded per axis, so every stored point lies within half
//!   a unit per axis of the position it was recorded from
//! - Deltas beyond the record range are split into evenly spaced steps;
//!   a jump too long to fit in the ring restarts the path
//! - A full ring evicts its oldest point
//!
//! ```text
//! next_read                    next_write
//!     │                            │
//!     ▼                            ▼
//! ┌────────┬──────┬──────┬──────┬──────┬─────┐
//! │sentinel│ d1   │ d2   │ d3   │      │ ... │     head = p0 + d1 + d2 + d3
//! └────────┴──────┴──────┴──────┴──────┴─────┘
//! ```

mod offset;

pub use offset::{RelativeOffset, MAX_DELTA, MIN_DELTA};

use libm::roundf;
use nalgebra::Vector3;

use crate::geo::MapProjection;
use crate::navigator::{GlobalPosition, HomePosition};

/// Tracking accuracy in meters (one record unit)
pub const ACCURACY: f32 = 2.0;

/// Number of records retained in the ring
///
/// The effective path length is about `RECENT_PATH_LENGTH * ACCURACY`.
pub const RECENT_PATH_LENGTH: usize = 64;

/// Longest jump, per axis in units, that the ring can hold as split steps
const MAX_PATH_UNITS: i32 = RECENT_PATH_LENGTH as i32 * MAX_DELTA;

const _: () = assert!(
    RECENT_PATH_LENGTH % 16 == 0,
    "RECENT_PATH_LENGTH must be a multiple of 16"
);

/// Geographic reference of the local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    projection: MapProjection,
    alt: f32,
}

impl Anchor {
    pub fn new(lat: f64, lon: f64, alt: f32) -> Self {
        Self {
            projection: MapProjection::new(lat, lon),
            alt,
        }
    }

    /// Geographic position to local NED meters
    pub fn to_local(&self, lat: f64, lon: f64, alt: f32) -> Vector3<f32> {
        let (north, east) = self.projection.project(lat, lon);
        Vector3::new(north, east, self.alt - alt)
    }

    /// Local NED meters to a geographic position (heading undefined)
    pub fn to_global(&self, local: &Vector3<f32>) -> GlobalPosition {
        let (lat, lon) = self.projection.reproject(local.x, local.y);
        GlobalPosition {
            lat,
            lon,
            alt: self.alt - local.z,
            yaw: f32::NAN,
        }
    }
}

/// Recent path tracker
#[derive(Debug, Clone)]
pub struct Tracker {
    anchor: Option<Anchor>,
    recent_path: [RelativeOffset; RECENT_PATH_LENGTH],
    /// Newest point (meaningless while the path is empty)
    head: Vector3<f32>,
    /// Always valid; 0 when empty, equal to `next_read` when full
    next_write: usize,
    /// `RECENT_PATH_LENGTH` when empty, else the oldest record
    next_read: usize,
    enabled: bool,
    evicted_count: u32,
}

impl Tracker {
    /// Tracker without an anchor; updates are ignored until [`reset`](Self::reset)
    pub fn new() -> Self {
        Self {
            anchor: None,
            recent_path: [RelativeOffset::EMPTY; RECENT_PATH_LENGTH],
            head: Vector3::zeros(),
            next_write: 0,
            next_read: RECENT_PATH_LENGTH,
            enabled: true,
            evicted_count: 0,
        }
    }

    /// Anchor the local frame at `home` and forget the recorded path
    pub fn reset(&mut self, home: &HomePosition) {
        self.anchor = Some(Anchor::new(home.lat, home.lon, home.alt));
        self.clear();
        log_info!("tracker: anchored at {} {} {}", home.lat, home.lon, home.alt);
    }

    /// Record a new global position
    pub fn update(&mut self, position: &GlobalPosition) {
        if !self.enabled {
            return;
        }
        if let Some(anchor) = self.anchor {
            self.push(anchor.to_local(position.lat, position.lon, position.alt));
        }
    }

    /// Record a position already expressed in the anchor frame
    pub fn update_local(&mut self, position: Vector3<f32>) {
        if self.enabled && self.anchor.is_some() {
            self.push(position);
        }
    }

    /// Take the newest point off the path
    pub fn pop_recent_path(&mut self) -> Option<GlobalPosition> {
        let anchor = self.anchor?;
        let local = self.pop_local()?;
        Some(anchor.to_global(&local))
    }

    /// Take the newest point off the path, in the anchor frame
    pub fn pop_local(&mut self) -> Option<Vector3<f32>> {
        if self.is_empty() {
            return None;
        }

        let point = self.head;
        let newest = self.newest_index();
        let record = self.recent_path[newest];

        if newest == self.next_read || !record.is_valid() {
            // Reached the sentinel (or a corrupt record), the path ends here
            self.clear();
        } else {
            self.head -= record.to_local();
            self.recent_path[newest] = RelativeOffset::EMPTY;
            self.next_write = newest;
        }

        Some(point)
    }

    /// Stored points, newest first, without consuming them
    pub fn recent_path(&self) -> RecentPath<'_> {
        RecentPath {
            tracker: self,
            index: self.newest_index(),
            remaining: self.len(),
            point: self.head,
        }
    }

    /// Newest stored point in the anchor frame
    pub fn head(&self) -> Option<Vector3<f32>> {
        (!self.is_empty()).then_some(self.head)
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        match (self.next_write + RECENT_PATH_LENGTH - self.next_read) % RECENT_PATH_LENGTH {
            0 => RECENT_PATH_LENGTH,
            n => n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next_read == RECENT_PATH_LENGTH
    }

    pub fn set_recent_path_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Local frame reference, `None` before the first reset
    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// Points lost to ring eviction since creation
    pub fn evicted_count(&self) -> u32 {
        self.evicted_count
    }

    /// Log every stored point, newest first
    pub fn dump_recent_path(&self) {
        log_info!("tracker: recent path ({} points)", self.len());
        for (i, point) in self.recent_path().enumerate() {
            log_info!("  {}: {} {} {}", i, point.lat, point.lon, point.alt);
        }
    }

    /// Forget the recorded path (the anchor is kept)
    pub fn clear(&mut self) {
        self.recent_path = [RelativeOffset::EMPTY; RECENT_PATH_LENGTH];
        self.head = Vector3::zeros();
        self.next_write = 0;
        self.next_read = RECENT_PATH_LENGTH;
    }

    fn newest_index(&self) -> usize {
        (self.next_write + RECENT_PATH_LENGTH - 1) % RECENT_PATH_LENGTH
    }

    fn push(&mut self, position: Vector3<f32>) {
        if !position.iter().all(|c| c.is_finite()) {
            log_warn!("tracker: non-finite position ignored");
            return;
        }

        if self.is_empty() {
            self.start_path(position);
            return;
        }

        let delta = position - self.head;
        if delta.norm() < ACCURACY {
            return;
        }

        // Checked in f32 so the unit casts below stay small
        let largest = roundf(delta.amax() / ACCURACY);
        if largest > MAX_PATH_UNITS as f32 {
            log_warn!(
                "tracker: {} m jump does not fit the path, restarting",
                delta.norm()
            );
            self.clear();
            self.start_path(position);
            return;
        }

        let units = [
            roundf(delta.x / ACCURACY) as i32,
            roundf(delta.y / ACCURACY) as i32,
            roundf(delta.z / ACCURACY) as i32,
        ];
        let largest = units.iter().map(|u| u.unsigned_abs()).max().unwrap_or(0);
        let max_step = MAX_DELTA.unsigned_abs();
        let steps = largest.div_ceil(max_step).max(1) as usize;

        let mut emitted = [0i32; 3];
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            let target = units.map(|u| roundf(u as f32 * fraction) as i32);

            match RelativeOffset::encode(
                target[0] - emitted[0],
                target[1] - emitted[1],
                target[2] - emitted[2],
            ) {
                Some(record) => {
                    self.push_record(record);
                    emitted = target;
                }
                None => {
                    log_warn!("tracker: step {} of {} out of range", step, steps);
                    break;
                }
            }
        }

        self.head += Vector3::new(emitted[0] as f32, emitted[1] as f32, emitted[2] as f32) * ACCURACY;
    }

    fn start_path(&mut self, position: Vector3<f32>) {
        self.push_record(RelativeOffset::SENTINEL);
        self.head = position;
    }

    fn push_record(&mut self, record: RelativeOffset) {
        if self.is_empty() {
            self.next_read = self.next_write;
        } else if self.next_write == self.next_read {
            // Full: drop the oldest point, its successor becomes the sentinel
            self.next_read = (self.next_read + 1) % RECENT_PATH_LENGTH;
            self.recent_path[self.next_read] = RelativeOffset::SENTINEL;
            self.evicted_count = self.evicted_count.saturating_add(1);
        }

        self.recent_path[self.next_write] = record;
        self.next_write = (self.next_write + 1) % RECENT_PATH_LENGTH;
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest-first iterator over the stored path
pub struct RecentPath<'a> {
    tracker: &'a Tracker,
    index: usize,
    remaining: usize,
    point: Vector3<f32>,
}

impl Iterator for RecentPath<'_> {
    type Item = GlobalPosition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let anchor = self.tracker.anchor?;

        let item = anchor.to_global(&self.point);
        let record = self.tracker.recent_path[self.index];

        self.remaining -= 1;
        if !record.is_valid() {
            self.remaining = 0;
        }
        self.point -= record.to_local();
        self.index = (self.index + RECENT_PATH_LENGTH - 1) % RECENT_PATH_LENGTH;

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
