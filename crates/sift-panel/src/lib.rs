#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod load;
pub mod partition;
pub mod schema;

pub use error::{PanelError, Result};
pub use extract::{PanelColumns, Signal};
pub use load::{
    PanelRecord, date_from_epoch_days, epoch_days, load_panel, load_panel_file,
    load_panel_file_keyed, load_panel_keyed, records_to_frame, write_panel_keyed,
};
pub use partition::{concat_products, partition_by_product};
pub use schema::{OptionalSignals, PanelSchema, QUALITY_COLUMNS, REQUIRED_COLUMNS};
