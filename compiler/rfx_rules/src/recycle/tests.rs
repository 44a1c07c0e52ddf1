use rfx_ir::ProjectOptions;

use super::*;
use crate::test_util::{android, assert_rewrites, assert_unchanged};

fn unit(body: &str) -> String {
    format!(
        "import android.content.Context;
import android.content.ContentProvider;
import android.content.res.TypedArray;
import android.database.Cursor;
import android.database.sqlite.SQLiteDatabase;
import android.net.Uri;

class Sample {{
    Cursor kept;
{body}}}
"
    )
}

#[test]
fn test_unread_cursor_is_closed_after_declaration() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    void f(SQLiteDatabase db) {
        Cursor cursor = db.query(\"TRIPS\",
                null, null, null, null, null, null);
    }
",
        ),
        &unit(
            "    void f(SQLiteDatabase db) {
        Cursor cursor = db.query(\"TRIPS\",
                null, null, null, null, null, null);
        cursor.close();
    }
",
        ),
    );
}

#[test]
fn test_close_follows_the_loop_holding_the_last_read() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    int f(SQLiteDatabase db) {
        int total = 0;
        Cursor cursor = db.rawQuery(\"q\", null);

        while (cursor.moveToNext()) {
            total += cursor.getInt(0);
        }

        return total;
    }
",
        ),
        &unit(
            "    int f(SQLiteDatabase db) {
        int total = 0;
        Cursor cursor = db.rawQuery(\"q\", null);

        while (cursor.moveToNext()) {
            total += cursor.getInt(0);
        }
        cursor.close();

        return total;
    }
",
        ),
    );
}

#[test]
fn test_each_assignment_gets_its_own_release() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    void f(Uri uri, ContentProvider provider) {
        Cursor query = provider.query(uri, null, null, null, null);
        query = provider.query(uri, null, null, null, null);
    }
",
        ),
        &unit(
            "    void f(Uri uri, ContentProvider provider) {
        Cursor query = provider.query(uri, null, null, null, null);
        query.close();
        query = provider.query(uri, null, null, null, null);
        query.close();
    }
",
        ),
    );
}

#[test]
fn test_early_exit_is_released_too() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    int f(SQLiteDatabase db, boolean quick) {
        Cursor c = db.rawQuery(\"q\", null);
        if (quick) {
            return 0;
        }
        int n = c.getCount();
        return n;
    }
",
        ),
        &unit(
            "    int f(SQLiteDatabase db, boolean quick) {
        Cursor c = db.rawQuery(\"q\", null);
        if (quick) {
            c.close();
            return 0;
        }
        int n = c.getCount();
        c.close();
        return n;
    }
",
        ),
    );
}

#[test]
fn test_exit_without_a_block_is_wrapped_in_one() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    int f(SQLiteDatabase db, boolean quick) {
        Cursor cursor = db.rawQuery(\"q\", null);
        if (quick) return 0;
        cursor.moveToNext();
        return 1;
    }
",
        ),
        &unit(
            "    int f(SQLiteDatabase db, boolean quick) {
        Cursor cursor = db.rawQuery(\"q\", null);
        if (quick) {
            cursor.close();
            return 0;
        }
        cursor.moveToNext();
        cursor.close();
        return 1;
    }
",
        ),
    );
}

#[test]
fn test_exits_inside_callbacks_are_not_released() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    void f(SQLiteDatabase db) {
        Cursor cursor = db.rawQuery(\"q\", null);
        Runnable r = new Runnable() {
            public void run() {
                return;
            }
        };
        cursor.moveToNext();
    }
",
        ),
        &unit(
            "    void f(SQLiteDatabase db) {
        Cursor cursor = db.rawQuery(\"q\", null);
        Runnable r = new Runnable() {
            public void run() {
                return;
            }
        };
        cursor.moveToNext();
        cursor.close();
    }
",
        ),
    );
}

#[test]
fn test_value_kept_on_some_paths_is_not_released_early() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    void f(SQLiteDatabase db, boolean fresh) {
        Cursor cursor = db.rawQuery(\"q\", null);
        if (fresh) {
            cursor = db.rawQuery(\"r\", null);
        }
        cursor.moveToNext();
    }
",
        ),
        &unit(
            "    void f(SQLiteDatabase db, boolean fresh) {
        Cursor cursor = db.rawQuery(\"q\", null);
        if (fresh) {
            cursor = db.rawQuery(\"r\", null);
        }
        cursor.moveToNext();
        cursor.close();
    }
",
        ),
    );
}

#[test]
fn test_typed_array_is_recycled() {
    assert_rewrites(
        &Recycle,
        android(),
        &unit(
            "    void f(Context context, int[] attrs) {
        TypedArray a = context.obtainStyledAttributes(attrs);
        int size = a.getInt(0);
    }
",
        ),
        &unit(
            "    void f(Context context, int[] attrs) {
        TypedArray a = context.obtainStyledAttributes(attrs);
        int size = a.getInt(0);
        a.recycle();
    }
",
        ),
    );
}

#[test]
fn test_returned_cursor_is_handed_off() {
    assert_unchanged(
        &Recycle,
        android(),
        &unit(
            "    Cursor f(SQLiteDatabase db) {
        Cursor cursor = db.rawQuery(\"q\", null);

        return cursor;
    }
",
        ),
    );
}

#[test]
fn test_closed_cursor_is_left_alone() {
    assert_unchanged(
        &Recycle,
        android(),
        &unit(
            "    void f(SQLiteDatabase db) {
        Cursor cursor = db.rawQuery(\"q\", null);
        cursor.moveToFirst();
        cursor.close();
    }
",
        ),
    );
}

#[test]
fn test_cursor_in_a_field_is_not_tracked() {
    assert_unchanged(
        &Recycle,
        android(),
        &unit(
            "    void f(SQLiteDatabase db) {
        kept = db.rawQuery(\"q\", null);
    }
",
        ),
    );
}

#[test]
fn test_only_for_android_projects() {
    assert_unchanged(
        &Recycle,
        ProjectOptions::default(),
        &unit(
            "    void f(SQLiteDatabase db) {
        Cursor cursor = db.rawQuery(\"q\", null);
    }
",
        ),
    );
}
