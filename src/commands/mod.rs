pub type CmdResult<T> = pubrename::Result<(T, i32)>;

pub mod rename;
