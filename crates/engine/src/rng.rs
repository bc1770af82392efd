//! Run-wide shared RNG handle.
//!
//! All actors draw from the same [`crate::samplers::Rng64`] instance so a
//! fixed seed reproduces the exact draw sequence across a run (`spec.md`
//! §5 "Determinism"). Sharing is sound without locks because the scheduler
//! is single-threaded (`spec.md` §9).

use crate::samplers::Rng64;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedRng = Rc<RefCell<Rng64>>;

pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => Rng64::from_seed(seed),
        None => Rng64::from_entropy(),
    };
    Rc::new(RefCell::new(rng))
}
