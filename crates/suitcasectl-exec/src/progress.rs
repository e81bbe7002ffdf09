/// Emitted as each file is streamed into a suitcase: a
/// `{index, current_file_ordinal, total_files_in_index, completed}` tuple
/// sent to a single progress channel. Completion is signaled exactly once
/// per suitcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub index: u32,
    pub current_file_ordinal: usize,
    pub total_files_in_index: usize,
    pub completed: bool,
}
