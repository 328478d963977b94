mod response;

pub(crate) use response::*;
