// What the auto-spin controller needs from a slot machine: pull the lever,
// flip the running indicator, and read balance, bet and mode between spins.
// Implemented by `Machine`.

use crate::game::SpinMode;
use crate::machine::Machine;
use crate::spin::{SpinError, SpinResult};

pub trait SlotEngine {
    // Actions
    fn spin(&mut self) -> Result<SpinResult, SpinError>;
    fn set_running(&mut self, running: bool);

    // Queries
    fn balance(&self) -> u64;
    fn bet(&self) -> u64;
    fn mode(&self) -> SpinMode;
    fn running(&self) -> bool;

    /// Whether the current bet can be placed.
    fn can_spin(&self) -> bool {
        self.bet() > 0 && self.bet() <= self.balance()
    }
}

impl SlotEngine for Machine {
    fn spin(&mut self) -> Result<SpinResult, SpinError> {
        self.spin()
    }
    fn set_running(&mut self, running: bool) {
        self.state_mut().set_running(running);
    }

    fn balance(&self) -> u64 {
        self.state().balance()
    }
    fn bet(&self) -> u64 {
        self.state().bet()
    }
    fn mode(&self) -> SpinMode {
        self.state().mode()
    }
    fn running(&self) -> bool {
        self.state().running()
    }
}
