pub(crate) mod payload;

pub(crate) use payload::DraftPayload;
