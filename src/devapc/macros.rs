/// Builds a `[SlaveDescriptor; N]` from `index => NAME` pairs.
///
/// Each `NAME` resolves to the policy alias `SLAVE_<NAME>` in the calling
/// scope and is kept as the descriptor's name.
macro_rules! slave_table {
    ($($index:literal => $name:ident),* $(,)?) => {
        paste::paste! {
            [$(
                $crate::devapc::table::SlaveDescriptor::new(
                    $index,
                    stringify!($name),
                    [<SLAVE_ $name>],
                ),
            )*]
        }
    };
}

pub(crate) use slave_table;
