// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

/// Formats a byte count in the largest unit that keeps the value under 1024.
///
/// Each step divides with truncation, so `2047` is `"1 KiB"`, not `"2 KiB"`.
pub fn bytes_to_str(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["B", "KiB", "MiB"];

    let mut value = bytes;
    for unit in UNITS {
        if value < 1024 {
            return format!("{value} {unit}");
        }
        value /= 1024;
    }
    format!("{value} GiB")
}
