mod handler;
mod model;

pub use handler::{api_not_found, append_to_sheet};
pub use model::{COLUMNS, IMAGE_FIELD, MAX_IMAGE_BYTES, SubmissionResponse, build_row, upload_name};
