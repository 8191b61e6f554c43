pub(crate) use completions::Completions;
pub(crate) use copy::Copy;
pub(crate) use create::Create;
pub(crate) use list::List;

mod completions;
mod copy;
mod create;
mod list;
