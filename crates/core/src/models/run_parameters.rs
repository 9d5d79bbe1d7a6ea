use crate::prelude::*;

/// Shape of a load run: how many virtual users, how many iterations each.
#[derive(Debug, Clone, Getters, Builder)]
pub struct RunParameters {
    #[getset(get = "pub")]
    virtual_users: usize,

    #[getset(get = "pub")]
    iterations_per_user: usize,

    #[getset(get = "pub")]
    #[builder(default)]
    retry_policy: RetryPolicy,
}

impl RunParameters {
    pub fn total_iterations(&self) -> usize {
        self.virtual_users * self.iterations_per_user
    }
}
