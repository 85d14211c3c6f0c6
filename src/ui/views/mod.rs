mod jokes_list;

pub use jokes_list::JokesListView;
