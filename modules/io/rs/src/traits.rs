use eyre::Result;

/// A trait for reading structured records. Modeled after the `Read` trait in the std.
pub trait ReadRecord {
    /// The type of the records that will be read.
    type Record: Default;

    /// Read a single record from the input into the provided buffer.
    /// Returns `true` if a record was read and `false` if the end of the input was reached.
    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool>;

    /// Fill a buffer with records from the input. Returns the number of records read, which could
    /// be less than the length of the buffer or equals 0 if the end of the input is reached.
    fn read_records(&mut self, into: &mut [Self::Record]) -> Result<usize> {
        let mut n = 0;
        for record in into {
            if !self.read_record(record)? {
                break;
            }
            n += 1;
        }
        Ok(n)
    }

    /// Read all remaining records, reusing the existing elements of `into` before appending.
    /// Returns the number of records read.
    fn read_to_end(&mut self, into: &mut Vec<Self::Record>) -> Result<usize> {
        let mut total = 0;
        for record in into.iter_mut() {
            if !self.read_record(record)? {
                into.truncate(total);
                return Ok(total);
            }
            total += 1;
        }

        loop {
            let mut record = Self::Record::default();
            if !self.read_record(&mut record)? {
                return Ok(total);
            }
            into.push(record);
            total += 1;
        }
    }
}

impl<T: ReadRecord + ?Sized> ReadRecord for Box<T> {
    type Record = T::Record;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        (**self).read_record(into)
    }

    fn read_records(&mut self, into: &mut [Self::Record]) -> Result<usize> {
        (**self).read_records(into)
    }
}

/// A trait for writing structured records. Modeled after the `Write` trait in the std.
pub trait WriteRecord {
    type Record;

    /// Write a single record.
    fn write_record(&mut self, record: &Self::Record) -> Result<()>;

    /// Write all records from the iterator in order.
    fn write_records<'a>(&mut self, records: impl IntoIterator<Item = &'a Self::Record>) -> Result<()>
    where
        Self::Record: 'a,
        Self: Sized,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flush the output.
    fn flush(&mut self) -> Result<()>;
}
