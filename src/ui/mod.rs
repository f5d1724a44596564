/// UI layer: the side/top panels and the per-tab central views.

pub mod panels;
pub mod views;
