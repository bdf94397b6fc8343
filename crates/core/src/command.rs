// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia_domain::{Category, Course, Member, MembershipType, Payment, Room, Teacher};

/// A command represents operator intent as data only.
///
/// Commands are the only way to request changes to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateCourse { course: Course },
    /// Update a course. A rename is propagated to members and teachers.
    UpdateCourse { id: i64, course: Course },
    DeleteCourse { id: i64 },
    CreateCategory { category: Category },
    /// Update a category. A rename is propagated to its courses.
    UpdateCategory { id: i64, category: Category },
    DeleteCategory { id: i64 },
    CreateRoom { room: Room },
    /// Update a room. A rename is propagated to course lessons.
    UpdateRoom { id: i64, room: Room },
    DeleteRoom { id: i64 },
    CreateTeacher { teacher: Teacher },
    UpdateTeacher { id: i64, teacher: Teacher },
    DeleteTeacher { id: i64 },
    CreateMember { member: Member },
    UpdateMember { id: i64, member: Member },
    DeleteMember { id: i64 },
    CreateMembershipType { membership_type: MembershipType },
    UpdateMembershipType {
        id: i64,
        membership_type: MembershipType,
    },
    DeleteMembershipType { id: i64 },
    /// Change the label and value of a pricing entry; its key and position are fixed.
    UpdatePricingTier {
        id: i64,
        description: String,
        value: String,
    },
    RecordPayment { payment: Payment },
    DeletePayment { id: i64 },
}
