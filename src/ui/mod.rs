pub mod event;
pub mod form;
pub mod markup;
pub mod widget;
