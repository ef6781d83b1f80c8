#[macro_export]
macro_rules! byte_map {
    ($($flag:expr,)*) => ([
        $($flag != 0,)*
    ])
}

/// Pulls the next byte out of a cursor-like reader, turning exhaustion into
/// `Http1Error::Partial`.
#[macro_export]
macro_rules! next {
    ($buf:ident) => {
        match $buf.next() {
            Some(b) => Ok(b),
            None => Err($crate::http1::Http1Error::Partial),
        }
    };
}

/// Like `next!` but does not advance the cursor.
#[macro_export]
macro_rules! peek {
    ($buf:ident) => {
        match $buf.peek() {
            Some(b) => Ok(b),
            None => Err($crate::http1::Http1Error::Partial),
        }
    };
}

#[macro_export]
macro_rules! expect {
    ($buf:ident.next() == $pat:pat => $ret:expr) => {
        expect!(next!($buf) => $pat |? $ret)
    };
    ($e:expr => $pat:pat_param |? $ret:expr) => {
        match $e {
            Ok(_v @ $pat) => (),
            Err(e) => return Err(e),
            _ => return $ret,
        }
    };
}
