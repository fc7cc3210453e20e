pub mod controller;
pub mod organizer;
pub mod workbench;

#[cfg(test)]
mod test_support;

pub use workbench::ChatWorkbench;
