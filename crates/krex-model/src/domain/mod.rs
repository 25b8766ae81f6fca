mod env;
pub use env::{EnvBinding, EnvBindings, EnvValue};

mod name;
pub use name::JobName;

mod restart;
pub use restart::RestartPolicy;

mod volume;
pub use volume::{SecretItem, Volume, VolumeMount, VolumeSource};
