//! `Trip`: an in-progress, scheduler-assigned round trip. Advances one
//! timestep at a time through [`Trip::age`], the per-trip state machine from
//! the simulation stepper (early-hold → outbound → parked → inbound).

use crate::environment::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip {
    dropoff_node: usize,
    parking_node: usize,
    request_duration: u32,
    duration_left: u32,
    early_time_left: u32,
    route_duration: u32,
    in_dropoff: bool,
    visited_parking: bool,
}

impl Trip {
    /// `request_duration` is `r0`; `early_time_left` is the request's
    /// `till_arrival` at the moment the scheduler committed it.
    pub fn new(
        dropoff_node: usize,
        parking_node: usize,
        request_duration: u32,
        early_time_left: u32,
        route_duration: u32,
    ) -> Self {
        Self {
            dropoff_node,
            parking_node,
            request_duration,
            duration_left: request_duration,
            early_time_left,
            route_duration,
            in_dropoff: true,
            visited_parking: false,
        }
    }

    pub fn dropoff_node(&self) -> usize {
        self.dropoff_node
    }

    pub fn parking_node(&self) -> usize {
        self.parking_node
    }

    pub fn request_duration(&self) -> u32 {
        self.request_duration
    }

    pub fn duration_left(&self) -> u32 {
        self.duration_left
    }

    pub fn early_time_left(&self) -> u32 {
        self.early_time_left
    }

    pub fn route_duration(&self) -> u32 {
        self.route_duration
    }

    pub fn in_dropoff(&self) -> bool {
        self.in_dropoff
    }

    /// Advance this trip by one timestep, releasing parking capacity at the
    /// moment it departs the lot. Returns `true` if the trip is finished
    /// (`duration_left == 0`, guaranteed to be back `in_dropoff`) and should
    /// be removed from the live list.
    pub fn age(&mut self, env: &mut Environment) -> bool {
        if self.early_time_left > 0 {
            self.early_time_left -= 1;
            return false;
        }

        let d = self.dropoff_node;
        let p = self.parking_node;
        let dropoff_to_parking = env.dropoff_to_parking()[d][p];
        let parking_to_dropoff = env.parking_to_dropoff()[p][d];

        if self.in_dropoff && !self.visited_parking {
            let duration_passed = self.request_duration - self.duration_left;
            if duration_passed == dropoff_to_parking {
                self.in_dropoff = false;
                self.visited_parking = true;
            }
        }

        if !self.in_dropoff && self.duration_left == parking_to_dropoff {
            self.in_dropoff = true;
            env.available_parking_spots_mut()[p] += 1;
        }

        self.duration_left -= 1;

        if self.duration_left == 0 && !self.in_dropoff && parking_to_dropoff == 0 {
            self.in_dropoff = true;
            env.available_parking_spots_mut()[p] += 1;
        }

        debug_assert!(
            self.duration_left > 0 || (self.duration_left == 0 && self.in_dropoff),
            "trip must be back in dropoff by the time its duration is exhausted"
        );

        self.duration_left == 0
    }
}
