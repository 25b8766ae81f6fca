mod domain;
pub use domain::{EnvBinding, EnvBindings, EnvValue, JobName, RestartPolicy};
pub use domain::{SecretItem, Volume, VolumeMount, VolumeSource};

mod credentials;
pub use credentials::{
    Credentials, ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SESSION_TOKEN,
};

mod error;
pub use error::{ModelError, ModelResult};

mod spec;
pub use spec::JobRequest;
