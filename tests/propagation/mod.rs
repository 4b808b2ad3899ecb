mod burns;
mod force_models;
mod propagators;
mod relative_motion;
