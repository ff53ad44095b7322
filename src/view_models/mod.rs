//! UI-ready reshaping of backend records.

pub mod application_list;

pub use application_list::{
    map_application_list, order_by_for, ApplicationListItem, ApplicationListView,
    ListItemVariant,
};
